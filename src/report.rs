use crate::config::Config;
use crate::schema::RankedTable;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::debug;

pub static INDEX_NAME: &str = "BIST100";

/// Write the dated markdown report: H1 date heading, the summary text, then
/// the full ranked table. One file per calendar day; a rerun on the same date
/// overwrites it.
pub async fn save_report(
    cfg: &Config,
    date: NaiveDate,
    summary: &str,
    table: &RankedTable,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(&cfg.reports_dir).await?;

    let path = cfg.reports_dir.join(format!("{date}-{INDEX_NAME}.md"));
    tokio::fs::write(&path, render(date, summary, table)).await?;
    debug!("report written: {}", path.display());
    Ok(path)
}

fn render(date: NaiveDate, summary: &str, table: &RankedTable) -> String {
    format!(
        "# {date} {INDEX_NAME} Raporu\n\n{summary}\n\n{}",
        table.to_markdown()
    )
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Quote;
    use std::path::PathBuf;

    fn cfg_in(dir: &std::path::Path) -> Config {
        Config {
            reports_dir: PathBuf::from(dir),
            ..Config::unconfigured()
        }
    }

    fn sample_table() -> RankedTable {
        RankedTable::from_quotes(vec![
            Quote::from_closes("AAA.IS", &[10.0, 11.0]).unwrap(),
            Quote::from_closes("BBB.IS", &[20.0, 19.0]).unwrap(),
        ])
    }

    #[tokio::test]
    async fn report_lands_at_dated_path_with_table() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let path = save_report(&cfg_in(dir.path()), date, "özet", &sample_table())
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("2024-01-01-BIST100.md"));
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.starts_with("# 2024-01-01"));
        assert!(content.contains("özet"));
        assert!(content.contains("| AAA | 11.00 | 10.00 |"));
        assert!(content.contains("| BBB | 19.00 | -5.00 |"));
    }

    #[tokio::test]
    async fn same_date_rerun_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let cfg = cfg_in(dir.path());

        save_report(&cfg, date, "ilk", &sample_table()).await.unwrap();
        let path = save_report(&cfg, date, "ikinci", &sample_table())
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("ikinci"));
        assert!(!content.contains("ilk"));
    }

    #[tokio::test]
    async fn reports_dir_created_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("reports");
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        let path = save_report(&cfg_in(&nested), date, "özet", &sample_table())
            .await
            .unwrap();
        assert!(path.exists());
    }
}
