//! Shared power mode of both axes.

/// Whether the drivers are energized and accepting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisMode {
    /// Energized; commands are executed immediately.
    #[default]
    Active,
    /// De-energized; only periodic supervision runs.
    Standby,
}

impl AxisMode {
    /// Get the mode name as a static string.
    pub fn name(self) -> &'static str {
        match self {
            AxisMode::Active => "Active",
            AxisMode::Standby => "Standby",
        }
    }
}
