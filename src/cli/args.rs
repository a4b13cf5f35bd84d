// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// ystrdist - Genetic distance matrices from Y-STR marker values
pub struct Args {
    /// persons file (.csv FTDNA export or whitespace separated .txt) or a directory of YFull .csv files
    #[argh(option)]
    pub persons: Option<String>,

    /// one-based CSV column used for person labels (default: 1)
    #[argh(option, default = "1")]
    pub label_column: usize,

    /// marker layout TOML file (default: built-in FTDNA 111-marker order)
    #[argh(option)]
    pub layout: Option<String>,

    /// mutation rate JSON file (default: every marker rate 1)
    #[argh(option)]
    pub rates_in: Option<String>,

    /// write the mutation rates in use to a JSON file
    #[argh(option)]
    pub rates_out: Option<String>,

    /// distance model: hybrid, infinite, count (default: hybrid)
    #[argh(option, default = "String::from(\"hybrid\")")]
    pub model: String,

    /// output distance matrix file
    #[argh(option)]
    pub matrix_out: Option<String>,

    /// output format: phylip, tsv, nexus (default: phylip)
    #[argh(option, default = "String::from(\"phylip\")")]
    pub format: String,

    /// write persons as tab separated text
    #[argh(option)]
    pub txt_out: Option<String>,

    /// write persons as an HTML table coloured by deviation from the first row
    #[argh(option)]
    pub html_out: Option<String>,

    /// number of marker values written to text and HTML tables (default: 67)
    #[argh(option, default = "67")]
    pub values: usize,

    /// replace IDs, names and labels by sequence numbers
    #[argh(switch)]
    pub anonymize: bool,

    /// prepend the modal haplotype to the persons
    #[argh(switch)]
    pub modal: bool,

    /// keep only persons tested for the first N markers and drop the rest
    #[argh(option)]
    pub markers: Option<usize>,

    /// keep only every Nth person
    #[argh(option)]
    pub reduce: Option<usize>,

    /// include only persons whose label matches this regex
    #[argh(option)]
    pub include: Option<String>,

    /// exclude persons whose label matches this regex
    #[argh(option)]
    pub exclude: Option<String>,

    /// generation length in years (default: 25)
    #[argh(option, default = "25.0")]
    pub generation: f64,

    /// calibration factor applied to distances (default: 1)
    #[argh(option, default = "1.0")]
    pub calibration: f64,

    /// print per-marker statistics
    #[argh(switch)]
    pub stats: bool,

    /// marker selection: minimum fraction of persons tested (0.0-1.0, default: 0.0)
    #[argh(option, default = "0.0")]
    pub select_min_frequency: f64,

    /// marker selection: minimum number of distinct values (default: 0)
    #[argh(option, default = "0")]
    pub select_min_values: usize,

    /// marker selection: maximum number of distinct values (default: unlimited)
    #[argh(option)]
    pub select_max_values: Option<usize>,

    /// write a counting rate table (1/n for each selected marker) to a JSON file
    #[argh(option)]
    pub counting_rates_out: Option<String>,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// show a progress bar while computing the matrix
    #[argh(switch)]
    pub progress: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}

impl Args {
    /// Whether any marker selection threshold is set.
    pub fn has_selection(&self) -> bool {
        self.select_min_frequency > 0.0 || self.select_min_values > 0 || self.select_max_values.is_some()
    }
}
