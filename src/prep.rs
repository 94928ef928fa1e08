pub mod config_reader;
pub mod export;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;

use log::{debug, info, warn};

use area_profile::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use text_diff::print_diff;

use crate::args::Args;
use crate::prep::config_reader::*;
use crate::prep::export::ExportSettings;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PrepError {
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("The Excel file {path} has no worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Unexpected cell content on line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Invalid header in {path}"))]
    Header { source: SchemaError, path: String },
    #[snafu(display("Invalid line {lineno} in {path}"))]
    Row {
        source: SchemaError,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON configuration {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error formatting the output"))]
    WritingCsv { source: csv::Error },
    #[snafu(display("Error writing output {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not compute the voting area profiles"))]
    Profile { source: ProfileError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PrepResult<T> = Result<T, PrepError>;

const STDOUT: &str = "stdout";

/// The settings of one run, once the command line and the configuration
/// file have been merged. The command line wins.
#[derive(PartialEq, Debug, Clone)]
struct RunSettings {
    input_path: String,
    provider: String,
    delimiter: u8,
    worksheet_name: Option<String>,
    output_path: Option<String>,
    export: ExportSettings,
    rules: ProfileRules,
    layout: ProfileLayout,
}

fn build_settings(args: &Args) -> PrepResult<RunSettings> {
    let (config, root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path.as_str())
                .parent()
                .map(|p| p.to_path_buf());
            (config, root)
        }
        None => (PrepConfig::default(), None),
    };
    let root_p = root.as_deref();

    let input_path = match (&args.input, &config.input_source.file_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => io_common::resolve_path(root_p, p),
        (None, None) => whatever!("No input file: use --input or the filePath of a --config file"),
    };

    let provider = args
        .input_type
        .clone()
        .or_else(|| config.input_source.provider.clone())
        .unwrap_or_else(|| "csv".to_string());

    let delimiter = match &config.input_source.delimiter {
        Some(d) => io_common::parse_delimiter(d)?,
        None => b';',
    };

    let worksheet_name = args
        .excel_worksheet_name
        .clone()
        .or_else(|| config.input_source.excel_worksheet_name.clone());

    let output_path = match (&args.out, &config.output_settings.output_path) {
        (Some(p), _) => Some(p.clone()),
        (None, Some(p)) if p == STDOUT => Some(p.clone()),
        (None, Some(p)) => Some(io_common::resolve_path(root_p, p)),
        (None, None) => None,
    };

    let missing_value_policy = match &args.missing_values {
        Some(s) => parse_missing_value_policy(s)?,
        None => config.rules.missing_value_policy()?,
    };

    let layout = match &config.output_settings.columns {
        Some(columns) => ProfileLayout::fv2022().with_output_columns(columns),
        None => ProfileLayout::fv2022(),
    };

    Ok(RunSettings {
        input_path,
        provider,
        delimiter,
        worksheet_name,
        output_path,
        export: ExportSettings {
            na_representation: config
                .output_settings
                .na_representation
                .clone()
                .unwrap_or_else(|| "NaN".to_string()),
        },
        rules: ProfileRules {
            missing_value_policy,
        },
        layout,
    })
}

fn read_source(settings: &RunSettings) -> PrepResult<Table> {
    info!(
        "Attempting to read {} file {:?}",
        settings.provider, settings.input_path
    );
    match settings.provider.as_str() {
        "csv" => io_csv::read_csv_table(&settings.input_path, settings.delimiter),
        "xlsx" => io_xlsx::read_xlsx_table(
            &settings.input_path,
            settings.worksheet_name.as_deref(),
        ),
        x => whatever!("Input type {:?} is not supported (csv or xlsx)", x),
    }
}

fn list_municipalities(table: &MunicipalityTable) {
    for (code, name) in table.iter() {
        println!("{:03};{}", code, name);
    }
}

/// The messages of an error and of its causes, outermost first.
pub fn error_messages(e: &PrepError) -> Vec<String> {
    let mut res = vec![e.to_string()];
    let mut source = std::error::Error::source(e);
    while let Some(s) = source {
        res.push(s.to_string());
        source = s.source();
    }
    res
}

pub fn run_preparation(args: &Args) -> PrepResult<()> {
    if args.list_municipalities {
        list_municipalities(&MunicipalityTable::capital_region());
        return Ok(());
    }

    let settings = build_settings(args)?;
    debug!("settings: {:?}", settings);

    let raw = read_source(&settings)?;
    let profiles =
        run_profile(raw, &settings.layout, &settings.rules).context(ProfileSnafu {})?;

    let text = export::render_csv(&profiles, &settings.export)?;
    match settings.output_path.as_deref() {
        None | Some(STDOUT) => print!("{}", text),
        Some(path) => {
            fs::write(path, text.as_bytes()).context(WritingOutputSnafu { path })?;
            info!("Wrote {} voting areas to {:?}", profiles.num_rows(), path);
        }
    }

    // The reference output, if provided for comparison
    if let Some(reference_path) = &args.reference {
        let reference = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
            path: reference_path.clone(),
        })?;
        if reference != text {
            warn!("Found differences with the reference output");
            print_diff(reference.as_str(), text.as_str(), "\n");
            whatever!("Difference detected between the produced output and the reference output")
        }
        info!("Output matches the reference {:?}", reference_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn each_message_once() {
        let e = PrepError::Profile {
            source: ProfileError::Schema(SchemaError::MissingColumn {
                column: "KredsNr".to_string(),
            }),
        };
        assert_eq!(
            error_messages(&e),
            vec![
                "Could not compute the voting area profiles".to_string(),
                "SchemaError: missing column \"KredsNr\"".to_string(),
            ]
        );
    }

    fn header() -> Vec<String> {
        let mut h: Vec<String> = IDENTIFIERS.iter().map(|s| s.to_string()).collect();
        for o in ORIGIN_GROUPS.iter() {
            h.push(format!("Befolkning efter herkomst_Mænd_{}", o));
            h.push(format!("Befolkning efter herkomst_Kvinder_{}", o));
        }
        for (_, label, _) in INCOME_BRACKETS.iter() {
            h.push(format!("{}{}", INCOME_PREFIX, label));
        }
        h.push(format!("{}{}", INCOME_PREFIX, HOUSEHOLDS_LABEL));
        for (_, label, _) in CAR_CLASSES.iter() {
            h.push(format!("{}{}", CAR_PREFIX, label));
        }
        h
    }

    /// A semicolon-separated line: identifiers, 24 origin cells, 8 income
    /// brackets, the household count and the 3 car classes.
    fn line(id: &str, origin: &str, income: &str, households: &str, cars: [&str; 3]) -> String {
        let mut fields: Vec<String> = vec![
            "1".to_string(),
            id.to_string(),
            "2".to_string(),
            "1".to_string(),
            "1".to_string(),
        ];
        fields.extend((0..24).map(|_| origin.to_string()));
        fields.extend((0..8).map(|_| income.to_string()));
        fields.push(households.to_string());
        fields.extend(cars.iter().map(|s| s.to_string()));
        fields.join(";")
    }

    fn write_input(dir: &TempDir, lines: &[String]) -> PathBuf {
        let p = dir.path().join("Befolkning.csv");
        let mut content = header().join(";");
        for l in lines.iter() {
            content.push('\n');
            content.push_str(l);
        }
        content.push('\n');
        fs::write(&p, content).unwrap();
        p
    }

    fn args_for(input: &Path, out: &Path) -> Args {
        Args {
            input: Some(input.display().to_string()),
            out: Some(out.display().to_string()),
            ..Default::default()
        }
    }

    fn read_output(out: &Path) -> Vec<Vec<String>> {
        let content = fs::read_to_string(out).unwrap();
        content
            .lines()
            .map(|l| l.split(',').map(|s| s.to_string()).collect())
            .collect()
    }

    fn value(rows: &[Vec<String>], row: usize, column: &str) -> String {
        let idx = rows[0].iter().position(|c| c == column).unwrap();
        rows[row][idx].clone()
    }

    #[test]
    fn car_shares_end_to_end() {
        init();
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, &[line("101001", "2", "0,5", "4,0", ["1,0", "2,0", "1,0"])]);
        let out = dir.path().join("socio_economic_data.csv");
        run_preparation(&args_for(&input, &out)).unwrap();

        let rows = read_output(&out);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ProfileLayout::fv2022().output_columns);
        assert_eq!(value(&rows, 1, "ValgstedId"), "101001");
        assert_eq!(value(&rows, 1, "Danmark"), "4");
        assert_eq!(value(&rows, 1, "total_population"), "48");
        assert_eq!(value(&rows, 1, "total_households"), "4");
        assert_eq!(value(&rows, 1, "households_share_income_750-k"), "0.125");
        assert_eq!(value(&rows, 1, "share_households_1car"), "0.25");
        assert_eq!(value(&rows, 1, "share_households_2pluscar"), "0.5");
        assert_eq!(value(&rows, 1, "share_households_nocar"), "0.25");
    }

    #[test]
    fn placeholders_and_empty_areas() {
        init();
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            &[
                line("101001", "-", "-", "-", ["-", "-", "-"]),
                line("101002", "1", "1", "0", ["1", "0", "0"]),
            ],
        );
        let out = dir.path().join("out.csv");
        run_preparation(&args_for(&input, &out)).unwrap();

        let rows = read_output(&out);
        assert_eq!(rows.len(), 3);
        assert_eq!(value(&rows, 1, "Afrika"), "0");
        assert_eq!(value(&rows, 1, "total_population"), "0");
        assert_eq!(value(&rows, 1, "share_households_1car"), "NaN");
        assert_eq!(value(&rows, 2, "share_households_1car"), "inf");
        assert_eq!(value(&rows, 2, "share_households_nocar"), "NaN");
    }

    #[test]
    fn stable_output() {
        init();
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            &[
                line("101001", "3", "2", "16", ["8", "4", "4"]),
                line("101002", "1,5", "1", "8", ["2", "2", "4"]),
            ],
        );
        let out = dir.path().join("out.csv");
        run_preparation(&args_for(&input, &out)).unwrap();

        // The first output is the reference for the second run.
        let reference = dir.path().join("reference.csv");
        fs::copy(&out, &reference).unwrap();
        let args = Args {
            reference: Some(reference.display().to_string()),
            ..args_for(&input, &out)
        };
        run_preparation(&args).unwrap();

        fs::write(&reference, "ValgstedId\n101001\n").unwrap();
        let res = run_preparation(&args);
        assert!(matches!(res, Err(PrepError::Whatever { .. })));
    }

    #[test]
    fn missing_category_writes_nothing() {
        init();
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("Befolkning.csv");
        let h: Vec<String> = header()
            .into_iter()
            .filter(|c| !c.ends_with("Husstande uden bil"))
            .collect();
        let l = line("101001", "1", "1", "8", ["1", "1", "1"]);
        let l: Vec<&str> = l.split(';').collect();
        let content = format!("{}\n{}\n", h.join(";"), l[..l.len() - 1].join(";"));
        fs::write(&p, content).unwrap();
        let out = dir.path().join("out.csv");

        let res = run_preparation(&args_for(&p, &out));
        match res {
            Err(PrepError::Profile {
                source: ProfileError::Schema(SchemaError::UnresolvedCategory { category, .. }),
            }) => assert_eq!(category, "households_nocar"),
            x => panic!("unexpected result {:?}", x),
        }
        assert!(!out.exists());
    }

    #[test]
    fn unparseable_cell() {
        init();
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, &[line("101001", "1", "1", "8", ["1", "x", "1"])]);
        let out = dir.path().join("out.csv");
        let res = run_preparation(&args_for(&input, &out));
        match res {
            Err(PrepError::Profile {
                source: ProfileError::Parse { value, row, .. },
            }) => {
                assert_eq!(value, "x");
                assert_eq!(row, 0);
            }
            x => panic!("unexpected result {:?}", x),
        }
        assert!(!out.exists());
    }

    #[test]
    fn short_line() {
        init();
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, &["1;101001;2".to_string()]);
        let out = dir.path().join("out.csv");
        let res = run_preparation(&args_for(&input, &out));
        assert!(matches!(res, Err(PrepError::CsvLineParse { lineno: 2, .. })));
    }

    #[test]
    fn missing_input() {
        init();
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("nope.csv");
        let out = dir.path().join("out.csv");
        let res = run_preparation(&args_for(&input, &out));
        assert!(matches!(res, Err(PrepError::CsvOpen { .. })));

        let res = run_preparation(&Args::default());
        assert!(matches!(res, Err(PrepError::Whatever { .. })));
    }

    #[test]
    fn unknown_input_type() {
        init();
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, &[]);
        let args = Args {
            input_type: Some("parquet".to_string()),
            ..args_for(&input, &dir.path().join("out.csv"))
        };
        assert!(matches!(
            run_preparation(&args),
            Err(PrepError::Whatever { .. })
        ));
    }

    #[test]
    fn config_file() {
        init();
        let dir = TempDir::new().unwrap();
        write_input(&dir, &[line("101001", "-", "1", "0", ["-", "0", "0"])]);
        let config = r#"{
            "inputSource": { "provider": "csv", "filePath": "Befolkning.csv", "delimiter": ";" },
            "outputSettings": {
                "outputPath": "profiles.csv",
                "naRepresentation": "",
                "columns": ["ValgstedId", "Danmark", "share_households_1car"]
            },
            "rules": { "missingValuePolicy": "propagateAsUndefined" }
        }"#;
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, config).unwrap();

        let args = Args {
            config: Some(config_path.display().to_string()),
            ..Default::default()
        };
        run_preparation(&args).unwrap();

        let content = fs::read_to_string(dir.path().join("profiles.csv")).unwrap();
        assert_eq!(content, "ValgstedId,Danmark,share_households_1car\n101001,,\n");

        // The command line wins over the file.
        let args = Args {
            missing_values: Some("treatAsZero".to_string()),
            ..args
        };
        run_preparation(&args).unwrap();
        let content = fs::read_to_string(dir.path().join("profiles.csv")).unwrap();
        assert_eq!(content, "ValgstedId,Danmark,share_households_1car\n101001,0,\n");

        let args = Args {
            missing_values: Some("ignore".to_string()),
            ..args
        };
        assert!(matches!(
            run_preparation(&args),
            Err(PrepError::Whatever { .. })
        ));
    }

    #[test]
    fn bad_config_file() {
        init();
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, "{ \"inputSource\": 3 }").unwrap();
        let args = Args {
            config: Some(config_path.display().to_string()),
            ..Default::default()
        };
        assert!(matches!(
            run_preparation(&args),
            Err(PrepError::ParsingJson { .. })
        ));
    }
}
