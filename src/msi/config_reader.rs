use crate::args::Args;

/// Everything needed for one run, resolved from the command line and the environment.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub input_file: String,
    pub input_sheet: String,
    pub output_file: String,
    pub reverse_items: Vec<String>,
    pub summary_file: Option<String>,
    pub reference_file: Option<String>,
}

impl Settings {
    pub fn from_args(args: &Args) -> Settings {
        Settings {
            input_file: args.input.clone(),
            input_sheet: args.input_sheet.clone(),
            output_file: args.output.clone(),
            reverse_items: args
                .reverse_items
                .as_deref()
                .map(parse_reverse_items)
                .unwrap_or_default(),
            summary_file: non_empty(&args.summary),
            reference_file: non_empty(&args.reference),
        }
    }
}

/// Splits a comma-separated list of item names. Blank entries are dropped.
pub fn parse_reverse_items(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(|x| x.to_string())
        .collect()
}

// An empty variable in the .env file means "not set"
fn non_empty(x: &Option<String>) -> Option<String> {
    match x {
        Some(s) if s.trim().is_empty() => None,
        x => x.clone(),
    }
}
