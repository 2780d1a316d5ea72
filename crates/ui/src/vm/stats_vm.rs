use backend::OverallStats;

/// One tile on the admin stats row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatTileVm {
    pub value: String,
    pub label: &'static str,
}

/// Maps the overall stats into display tiles.
#[must_use]
pub fn map_stat_tiles(stats: &OverallStats) -> Vec<StatTileVm> {
    vec![
        StatTileVm {
            value: stats.total_students.to_string(),
            label: "Students",
        },
        StatTileVm {
            value: stats.total_subjects.to_string(),
            label: "Subjects",
        },
        StatTileVm {
            value: format!("{}%", stats.average_progress),
            label: "Average progress",
        },
    ]
}
