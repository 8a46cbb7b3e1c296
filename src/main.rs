use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use xltxt::cli::{self, RunOptions, EXIT_FAILURE, EXIT_SUCCESS};
use xltxt::types::InputMode;

#[derive(Parser)]
#[command(name = "xltxt")]
#[command(about = "Save spreadsheet worksheets as tab separated text files")]
#[command(long_about = "xltxt - Save spreadsheet worksheets as tab separated text files

Each worksheet is written to <folder>/[<dir>/]<workbook>.<worksheet>.txt,
replacing any previous file at that path.

COMMAND LINE MODE:
  xltxt <workbook> [worksheet] [range]

  worksheet  omitted: the first worksheet; '*': every worksheet
  range      omitted: the whole populated extent
             'A2:D'  : from A2 to column D of the last populated row
             'A2:D50': exactly that range

CONFIG FILE MODE:
  xltxt <settings.json>

  { \"appSettings\": {
      \"Schedule\":  { \"file\": \"Class Schedule.xlsx\", \"worksheet\": \"Week 1\", \"range\": \"A2:P\" },
      \"AllSheets\": { \"file\": \"Attendance/Report.xlsx\", \"worksheet\": \"*\" }
  } }

EXIT STATUS:
  0 success, 100 any error (message printed on stdout)")]
#[command(version)]
struct Cli {
    /// Workbook path or JSON settings file, then [worksheet] [range]
    #[arg(num_args = 0..=3)]
    args: Vec<String>,

    /// How to read the first argument: auto, cli or file
    #[arg(short, long, default_value = "auto")]
    mode: InputMode,

    /// Base folder for relative workbook paths and output files (default: current directory)
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// Write text files under this folder instead
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file extension
    #[arg(short, long, env = "XLTXT_EXTENSION")]
    extension: Option<String>,

    /// Resolve ranges and output paths without writing files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = cli::init_logging(cli.verbose) {
        println!("XL error: {}", e);
        return ExitCode::from(EXIT_FAILURE);
    }

    let options = RunOptions {
        mode: cli.mode,
        folder: cli.folder,
        output_dir: cli.output_dir,
        extension: cli.extension,
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };

    match cli::run(&cli.args, options) {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            println!("XL error: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
