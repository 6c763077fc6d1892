use clap::Parser;

/// Rescales the answers of a Likert survey with the Method of Successive Intervals.
///
/// Every option can also be set in the environment or in a `.env` file.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The survey answers, one column per item. Excel (.xlsx) or CSV (.csv) files are supported.
    #[clap(short, long, env = "INPUT_FILE", default_value = "responses.xlsx", value_parser)]
    pub input: String,

    /// When using an Excel file, the name of the worksheet to read.
    #[clap(long, env = "INPUT_SHEET", default_value = "Sheet1", value_parser)]
    pub input_sheet: String,

    /// (file path) The Excel workbook to write. It will contain the statistics of each item (Sheet1)
    /// and the rescaled answers (Sheet2).
    #[clap(short, long, env = "OUTPUT_FILE", default_value = "MSI_all_in_one.xlsx", value_parser)]
    pub output: String,

    /// (list of comma-separated item names or empty) The items whose scale is inverted before the
    /// transformation.
    #[clap(long, env = "REVERSE_ITEMS", value_parser)]
    pub reverse_items: Option<String>,

    /// (file path, optional) If specified, the statistics of all the items will be written in JSON
    /// format to the given location.
    #[clap(long, env = "MSI_SUMMARY_FILE", value_parser)]
    pub summary: Option<String>,

    /// (file path, optional) A summary in JSON format from a previous run. If provided, the program
    /// checks that the computed statistics match the reference.
    #[clap(long, env = "MSI_REFERENCE_FILE", value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
