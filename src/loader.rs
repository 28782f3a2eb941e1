use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use tracing_error::SpanTrace;

use crate::domain::LeadsError;
use crate::lead::{Lead, LeadId, LeadStatus};

#[derive(Debug, PartialEq)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

const COLUMNS: [&str; 8] = [
    "id",
    "name",
    "email",
    "phone",
    "status",
    "origin",
    "owner",
    "last_activity",
];

/// Expands `~` and environment variables in a user supplied path.
pub fn expand_path(raw: &str) -> Result<PathBuf, LeadsError> {
    shellexpand::full(raw)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| LeadsError::LoadingFailed(e.to_string()))
}

#[instrument]
pub fn load_leads(path: &Path) -> Result<Vec<Lead>, LeadsError> {
    let result = read_leads(path);
    if let Err(e) = &result {
        error!("Loading {} failed: {e}\n{}", path.display(), SpanTrace::capture());
    }
    result
}

fn read_leads(path: &Path) -> Result<Vec<Lead>, LeadsError> {
    let file_type = check_file(path)?;
    let frame = match file_type {
        FileType::CSV => load_csv(path)?,
        FileType::PARQUET => load_parquet(path)?,
        FileType::ARROW => load_arrow(path)?,
    };

    let start_time = Instant::now();
    let df = frame.collect()?;
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    if let Some(missing) = COLUMNS.iter().find(|c| !available.iter().any(|a| a == *c)) {
        return Err(LeadsError::MissingColumn(missing.to_string()));
    }

    // One thread per column, every value is converted into a String as is.
    let columns: Result<Vec<Vec<String>>, PolarsError> = COLUMNS
        .par_iter()
        .map(|name| load_column(&df, name))
        .collect();
    let columns = columns?;
    debug!(
        "Extracted {} columns in {}ms",
        columns.len(),
        start_time.elapsed().as_millis()
    );

    let leads = build_leads(&columns)?;
    info!("Loaded {} leads from {}", leads.len(), path.display());
    Ok(leads)
}

fn build_leads(columns: &[Vec<String>]) -> Result<Vec<Lead>, LeadsError> {
    let nrows = columns.first().map(|c| c.len()).unwrap_or(0);
    let mut seen: HashSet<LeadId> = HashSet::with_capacity(nrows);
    let mut leads = Vec::with_capacity(nrows);
    for row in 0..nrows {
        let cell = |c: usize| columns[c][row].clone();

        let raw_id = cell(0);
        let id: LeadId = raw_id
            .trim()
            .parse()
            .map_err(|_| LeadsError::InvalidId(raw_id.clone()))?;
        if !seen.insert(id) {
            return Err(LeadsError::DuplicateId(id));
        }
        let raw_status = cell(4);
        let status =
            LeadStatus::parse(&raw_status).ok_or(LeadsError::UnknownStatus(raw_status))?;

        leads.push(Lead {
            id,
            name: cell(1),
            email: cell(2),
            phone: cell(3),
            status,
            origin: cell(5),
            owner: cell(6),
            last_activity: cell(7),
        });
    }
    Ok(leads)
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<Vec<String>, PolarsError> {
    let col = df.column(col_name)?.cast(&DataType::String)?;
    let series = col.str()?;
    Ok(series
        .into_iter()
        .map(|value| value.map(str::to_string).unwrap_or_default())
        .collect())
}

fn check_file(path: &Path) -> Result<FileType, LeadsError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LeadsError::FileNotFound,
        ErrorKind::PermissionDenied => LeadsError::PermissionDenied,
        _ => LeadsError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(LeadsError::LoadingFailed("Not a file!".into()));
    }
    detect_file_type(path)
}

fn detect_file_type(path: &Path) -> Result<FileType, LeadsError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(LeadsError::UnknownFileType),
    }
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("leads-{}-{name}", std::process::id()))
    }

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = temp_path(name);
        fs::write(&path, content).unwrap();
        path
    }

    const HEADER: &str = "id,name,email,phone,status,origin,owner,last_activity\n";

    #[test]
    fn loads_csv_records_in_file_order() {
        let path = write_temp(
            "ok.csv",
            &format!(
                "{HEADER}7,Zoe Ramos,zoe@x.com,(11) 1,Novo,Landing Page,Diego,1h ago\n\
                 3,Ana Paz,ana@x.com,,In progress,Indicação,Melissa,2d ago\n"
            ),
        );
        let leads = load_leads(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(leads.iter().map(|l| l.id).collect::<Vec<_>>(), vec![7, 3]);
        assert_eq!(leads[0].status, LeadStatus::New);
        assert_eq!(leads[1].status, LeadStatus::InProgress);
        assert_eq!(leads[1].phone, "");
        assert_eq!(leads[1].origin, "Indicação");
    }

    #[test]
    fn keeps_free_text_cells_verbatim() {
        let path = write_temp(
            "pad.csv",
            &format!("{HEADER} 4 ,\" Ana \",\"ana@x.com \",\" (11) 2\", novo ,o,w,now\n"),
        );
        let leads = load_leads(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(leads[0].id, 4);
        assert_eq!(leads[0].status, LeadStatus::New);
        assert_eq!(leads[0].name, " Ana ");
        assert_eq!(leads[0].email, "ana@x.com ");
        assert_eq!(leads[0].phone, " (11) 2");
    }

    fn sample_frame() -> DataFrame {
        df!(
            "id" => [7i64, 3],
            "name" => ["Zoe Ramos", "Ana Paz"],
            "email" => ["zoe@x.com", "ana@x.com"],
            "phone" => ["(11) 1", "(21) 2"],
            "status" => ["Arquivado", "In progress"],
            "origin" => ["Landing Page", "Indicação"],
            "owner" => ["Diego", "Melissa"],
            "last_activity" => ["1h ago", "2d ago"],
        )
        .unwrap()
    }

    fn assert_sample(leads: &[Lead]) {
        assert_eq!(leads.iter().map(|l| l.id).collect::<Vec<_>>(), vec![7, 3]);
        assert_eq!(leads[0].status, LeadStatus::Archived);
        assert_eq!(leads[1].status, LeadStatus::InProgress);
        assert_eq!(leads[1].origin, "Indicação");
    }

    #[test]
    fn loads_parquet_records() {
        for ext in ["parquet", "pq"] {
            let path = temp_path(&format!("ok.{ext}"));
            let file = fs::File::create(&path).unwrap();
            ParquetWriter::new(file).finish(&mut sample_frame()).unwrap();
            let leads = load_leads(&path);
            fs::remove_file(&path).ok();
            assert_sample(&leads.unwrap());
        }
    }

    #[test]
    fn loads_arrow_records() {
        for ext in ["arrow", "ipc", "feather"] {
            let path = temp_path(&format!("ok.{ext}"));
            let file = fs::File::create(&path).unwrap();
            IpcWriter::new(file).finish(&mut sample_frame()).unwrap();
            let leads = load_leads(&path);
            fs::remove_file(&path).ok();
            assert_sample(&leads.unwrap());
        }
    }

    #[test]
    fn file_type_from_extension() {
        let kind = |name: &str| detect_file_type(Path::new(name)).ok();
        assert_eq!(kind("a.CSV"), Some(FileType::CSV));
        assert_eq!(kind("a.pq"), Some(FileType::PARQUET));
        assert_eq!(kind("a.Feather"), Some(FileType::ARROW));
        assert_eq!(kind("a.json"), None);
        assert_eq!(kind("noext"), None);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let path = write_temp(
            "dup.csv",
            &format!("{HEADER}1,A,a@x,1,New,o,w,now\n1,B,b@x,2,New,o,w,now\n"),
        );
        let result = load_leads(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(LeadsError::DuplicateId(1))));
    }

    #[test]
    fn rejects_unknown_status() {
        let path = write_temp("status.csv", &format!("{HEADER}1,A,a@x,1,Lost,o,w,now\n"));
        let result = load_leads(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(LeadsError::UnknownStatus(s)) if s == "Lost"));
    }

    #[test]
    fn rejects_missing_columns() {
        let path = write_temp("cols.csv", "id,name\n1,A\n");
        let result = load_leads(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(LeadsError::MissingColumn(c)) if c == "email"));
    }

    #[test]
    fn missing_file_and_unknown_extension() {
        let missing = std::env::temp_dir().join("leads-does-not-exist.csv");
        assert!(matches!(load_leads(&missing), Err(LeadsError::FileNotFound)));

        let path = write_temp("data.xlsx", "whatever");
        let result = load_leads(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(LeadsError::UnknownFileType)));
    }

    #[test]
    fn path_expansion() {
        assert_eq!(
            expand_path("/tmp/leads.csv").unwrap(),
            PathBuf::from("/tmp/leads.csv")
        );
        assert!(matches!(
            expand_path("$LEADS_TEST_UNDEFINED_VARIABLE/leads.csv"),
            Err(LeadsError::LoadingFailed(_))
        ));
    }
}
