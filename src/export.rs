use crate::errors::AppError;
use crate::models::HistoryEntry;

pub const EXPORT_FILE_NAME: &str = "step_history.csv";

/// Renders the history as `Date,Steps` CSV, one row per entry in log order.
pub fn history_csv(history: &[HistoryEntry]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Date", "Steps"])?;
    for entry in history {
        writer.write_record([entry.date.clone(), entry.steps.to_string()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| AppError::internal(err.into_error()))?;
    String::from_utf8(bytes).map_err(AppError::internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_is_header_only() {
        assert_eq!(history_csv(&[]).unwrap(), "Date,Steps\n");
    }

    #[test]
    fn rows_keep_history_order() {
        let history = vec![
            HistoryEntry { date: "2026-10-15".into(), steps: 5321 },
            HistoryEntry { date: "2026-10-14".into(), steps: 87 },
        ];
        assert_eq!(
            history_csv(&history).unwrap(),
            "Date,Steps\n2026-10-15,5321\n2026-10-14,87\n"
        );
    }
}
