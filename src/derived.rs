//! Pure display transforms over decoded snapshots. No I/O, no state; total
//! over their documented input domain.

use std::fmt;

/// Zero-padded display clock derived from minutes since simulation-day
/// start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: String,
    pub minutes: String,
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hours, self.minutes)
    }
}

pub fn format_time_of_day(elapsed_minutes: u32) -> TimeOfDay {
    let hours = (elapsed_minutes / 60) % 24;
    let minutes = elapsed_minutes % 60;
    TimeOfDay {
        hours: format!("{hours:02}"),
        minutes: format!("{minutes:02}"),
    }
}

/// Coarse bucket of the simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCyclePhase {
    Morning,
    Day,
    Afternoon,
    Night,
}

impl fmt::Display for DayCyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayCyclePhase::Morning => "Morning",
            DayCyclePhase::Day => "Day",
            DayCyclePhase::Afternoon => "Afternoon",
            DayCyclePhase::Night => "Night",
        };
        f.write_str(s)
    }
}

/// Buckets are half-open: 6, 12 and 18 belong to the next phase.
pub fn day_cycle_phase(hours: u32) -> DayCyclePhase {
    match hours {
        h if h < 6 => DayCyclePhase::Morning,
        h if h < 12 => DayCyclePhase::Day,
        h if h < 18 => DayCyclePhase::Afternoon,
        _ => DayCyclePhase::Night,
    }
}

/// Label for a binary source-select flag, used identically for PLC coil
/// state and transfer-switch state.
pub fn active_source_label(solar: bool) -> &'static str {
    if solar {
        "Solar Panel Power"
    } else {
        "Mains Power"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_of_day_padding() {
        let t = format_time_of_day(375);
        assert_eq!(t.hours, "06");
        assert_eq!(t.minutes, "15");
        assert_eq!(t.to_string(), "06:15");

        let t = format_time_of_day(0);
        assert_eq!(t.hours, "00");
        assert_eq!(t.minutes, "00");
    }

    #[test]
    fn test_format_time_of_day_wraps_at_day_boundary() {
        assert_eq!(format_time_of_day(1440), format_time_of_day(0));
        assert_eq!(format_time_of_day(1441).to_string(), "00:01");
    }

    #[test]
    fn test_format_time_of_day_always_in_range() {
        for m in (0..3000).step_by(7) {
            let t = format_time_of_day(m);
            let h: u32 = t.hours.parse().unwrap();
            let min: u32 = t.minutes.parse().unwrap();
            assert!(h < 24, "hour {} out of range for {} minutes", h, m);
            assert!(min < 60, "minute {} out of range for {} minutes", min, m);
            assert_eq!(t.hours.len(), 2);
            assert_eq!(t.minutes.len(), 2);
        }
    }

    #[test]
    fn test_day_cycle_phase_boundaries() {
        assert_eq!(day_cycle_phase(0), DayCyclePhase::Morning);
        assert_eq!(day_cycle_phase(5), DayCyclePhase::Morning);
        assert_eq!(day_cycle_phase(6), DayCyclePhase::Day);
        assert_eq!(day_cycle_phase(11), DayCyclePhase::Day);
        assert_eq!(day_cycle_phase(12), DayCyclePhase::Afternoon);
        assert_eq!(day_cycle_phase(17), DayCyclePhase::Afternoon);
        assert_eq!(day_cycle_phase(18), DayCyclePhase::Night);
        assert_eq!(day_cycle_phase(23), DayCyclePhase::Night);
    }

    #[test]
    fn test_active_source_label() {
        assert_eq!(active_source_label(true), "Solar Panel Power");
        assert_eq!(active_source_label(false), "Mains Power");
    }
}
