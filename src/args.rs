use clap::Parser;

/// Prepares the socio-economic profile of every voting area: population by origin,
/// household income shares and car ownership shares.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the input, the output and the rules.
    /// Relative paths inside it are read from the directory of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The area statistics export. Setting this option overrides the path that
    /// may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv (semicolon-separated) or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path, 'stdout' or empty) Where the profiles are written, as comma-separated values.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference output. If provided, the produced output must match it exactly.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default treatAsZero) What a '-' or empty cell means: treatAsZero, reject or
    /// propagateAsUndefined.
    #[clap(long, value_parser)]
    pub missing_values: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use (default: the first one).
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// Prints the known municipality codes and names, and exits.
    #[clap(long, takes_value = false)]
    pub list_municipalities: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
