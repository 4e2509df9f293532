use clap::Parser;

use crate::bootstrap::bootstrap_cmd;
use crate::includes::includes_cmd;

mod bootstrap;
mod decompress;
mod includes;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Unpack the built-in theme and a sample configuration
    Bootstrap(BootstrapArgs),
    /// Generate the theme include partials from a directory of CSS and JS files
    Includes(IncludesArgs),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct BootstrapArgs {
    /// Directory where the theme will be unpacked
    #[arg(short, long)]
    out_dir: String,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct IncludesArgs {
    /// Directory with the mirrored theme assets
    #[arg(short, long)]
    assets_dir: String,

    /// Template directory that receives the partials
    #[arg(short, long)]
    template_dir: String,
}

fn main() {
    let args = Args::parse();

    match args {
        Args::Bootstrap(args) => bootstrap_cmd(args),
        Args::Includes(args) => includes_cmd(args),
    };
}
