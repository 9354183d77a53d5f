//! CSV export of a whole session.
//!
//! The column layout and number formatting are an interchange format with
//! previously exported files and must not change.

use crate::prelude::{CoreError, CoreResult, FRAME_RATE};
use crate::session::{Channel, Session};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;

pub const CSV_HEADER: &str = "Frame,Time,Accuracy,Velocity,Fatigue,Confidence";

/// Renders every frame as one CSV row below a fixed header.
pub fn session_to_csv(session: &Session) -> String {
    let mut out = String::with_capacity(48 * (session.frame_count() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    let accuracy = session.channel(Channel::Accuracy);
    let velocity = session.channel(Channel::Velocity);
    let fatigue = session.channel(Channel::Fatigue);
    let confidence = session.channel(Channel::Confidence);

    for i in 0..session.frame_count() {
        let time = i as f32 / FRAME_RATE;
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "{},{:.3},{:.2},{:.2},{:.2},{:.2}",
            i, time, accuracy[i], velocity[i], fatigue[i], confidence[i]
        );
    }
    out
}

/// File name for an export stamped at `stamp`: profile name with spaces
/// replaced, then the date and time.
pub fn export_file_name(session: &Session, stamp: OffsetDateTime) -> CoreResult<String> {
    let stamp = stamp
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .map_err(|err| CoreError::Timestamp(err.to_string()))?;
    Ok(format!(
        "Session_{}_{}.csv",
        session.profile_name().replace(' ', "_"),
        stamp
    ))
}

/// Wall-clock time of an export, local where the offset can be determined.
pub fn export_timestamp() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Writes the session CSV into `dir`, creating it if needed, and returns the
/// written path. The name is stamped with the export time.
pub fn write_export(session: &Session, dir: &Path) -> CoreResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(session, export_timestamp())?);
    fs::write(&path, session_to_csv(session))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn two_frame_session() -> Session {
        Session::from_channels(
            "Baseline Model",
            vec![50.0, 51.0],
            vec![1.25, 1.2],
            vec![12.0, 12.5],
            vec![92.0, 91.0],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn csv_matches_interchange_format_exactly() {
        let csv = session_to_csv(&two_frame_session());
        assert_eq!(
            csv,
            "Frame,Time,Accuracy,Velocity,Fatigue,Confidence\n\
             0,0.000,50.00,1.25,12.00,92.00\n\
             1,0.033,51.00,1.20,12.50,91.00\n"
        );
    }

    #[test]
    fn csv_has_one_row_per_frame() {
        let session = Session::from_channels(
            "Long",
            vec![1.0; 90],
            vec![1.0; 90],
            vec![1.0; 90],
            vec![1.0; 90],
            Vec::new(),
        )
        .unwrap();
        let csv = session_to_csv(&session);
        assert_eq!(csv.lines().count(), 91);
        assert!(csv.lines().last().unwrap().starts_with("89,2.967,"));
    }

    #[test]
    fn file_name_replaces_spaces_and_uses_the_given_stamp() {
        let stamp = datetime!(2024-03-05 14:07:09 UTC);
        let name = export_file_name(&two_frame_session(), stamp).unwrap();
        assert_eq!(name, "Session_Baseline_Model_20240305_140709.csv");
    }

    #[test]
    fn export_stamp_is_taken_at_export_time() {
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let stamp = export_timestamp().unix_timestamp();
        let after = OffsetDateTime::now_utc().unix_timestamp();
        assert!(before <= stamp && stamp <= after);

        let session = two_frame_session();
        let later = datetime!(2030-01-01 00:00:00 UTC);
        assert_ne!(
            export_file_name(&session, session.created_at()).unwrap(),
            export_file_name(&session, later).unwrap()
        );
    }

    #[test]
    fn write_export_creates_file_with_csv_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let session = two_frame_session();
        let path = write_export(&session, &target).unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, session_to_csv(&session));
    }
}
