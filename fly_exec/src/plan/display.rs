//! Human readable dump of a flight plan

use std::fmt;

use super::FlightPlan;

impl fmt::Display for FlightPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Flight parameters")?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>5} {:>10} {:>10} {:>10} {:>10}",
            "Point", "X (m)", "Y (m)", "Z (m)", "Hover (s)"
        )?;
        for (i, wp) in self.waypoints.iter().enumerate() {
            writeln!(
                f,
                "{:>5} {:>10.1} {:>10.1} {:>10.1} {:>10.1}",
                i, wp.x_m, wp.y_m, wp.z_m, wp.hover_s
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:>5} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Leg", "Dist (m)", "Time (s)", "Vel (m/s)", "dZ (m)", "Hdg (deg)", "Rot (deg)"
        )?;
        for leg in self.legs.iter() {
            writeln!(
                f,
                "{:>5} {:>10.3} {:>10} {:>10.3} {:>10.1} {:>10} {:>10.1}",
                leg.index,
                leg.distance_m,
                leg.travel_time_s(),
                leg.fwd_velocity_ms(),
                leg.height_delta_m,
                leg.heading_deg,
                leg.rotation_angle_deg()
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Headings (deg): {:?}", self.headings_deg)?;
        write!(
            f,
            "Return rotation (deg): {:.1}",
            self.return_rotation_deg.unwrap_or(0.0)
        )
    }
}

#[cfg(test)]
mod test {
    use crate::plan::{plan, PlanParams, Waypoint};

    #[test]
    fn test_display_lists_every_leg() {
        let plan = plan(
            vec![
                Waypoint::new(0.0, 0.0, 0.0, 0.0),
                Waypoint::new(0.0, 10.0, 0.0, 0.0),
                Waypoint::new(10.0, 10.0, 1.0, 5.0),
            ],
            &PlanParams::default()
        ).unwrap();

        let dump = format!("{}", plan);

        assert!(dump.contains("Headings (deg): [0, 0, 90]"));
        assert!(dump.contains("Return rotation (deg): -90.0"));
        // Header plus three points plus header plus two legs
        assert_eq!(dump.lines().filter(|l| l.trim_start().starts_with(char::is_numeric)).count(), 5);
    }
}
