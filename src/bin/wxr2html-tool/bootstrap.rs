use std::fs;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::decompress::decompress_files;
use crate::BootstrapArgs;

const CFG_FILE_NAME: &str = "wxr2html.toml";

lazy_static! {
    static ref RES_REGEX: Regex = Regex::new(r#"(res)/\w+"#).unwrap();
}

fn get_sample_cfg() -> &'static str {
    include_str!("../../../res/wxr2html.toml")
}

fn write_sample_cfg(out_dir: &Path) -> io::Result<()> {
    let file = File::create(out_dir.join(CFG_FILE_NAME))?;
    let mut writer = BufWriter::new(file);

    let sample_cfg = replace_paths(out_dir, get_sample_cfg());
    writer.write_all(sample_cfg.as_bytes())?;

    writer.flush()
}

/// Points the `res/...` paths of the sample configuration at `prefix`.
fn replace_paths(prefix: &Path, config_data: &str) -> String {
    let prefix = prefix.to_string_lossy();
    let prefix = prefix.trim_end_matches('/');

    let result = RES_REGEX.replace_all(config_data, |captures: &regex::Captures| {
        let matched = &captures[0];
        format!("{}{}", prefix, &matched[captures[1].len()..])
    });

    result.to_string()
}

pub fn bootstrap_cmd(args: BootstrapArgs) {
    let out_path = match fs::canonicalize(&args.out_dir) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error converting path to absolute: {} - {}", &args.out_dir, e);
            return;
        }
    };

    if !out_path.is_dir() {
        eprintln!("Output path must be a directory: {}", out_path.display());
        return;
    }

    if let Err(e) = decompress_files(&out_path) {
        eprintln!("Error bootstrapping: {}", e);
        return;
    };

    if let Err(e) = write_sample_cfg(&out_path) {
        eprintln!("Error writing configuration: {}", e);
        return;
    }

    println!("Theme unpacked in {}", out_path.display());
    println!("Edit {} and run wxr2html -c {} <export.xml>",
             out_path.join(CFG_FILE_NAME).display(), out_path.join(CFG_FILE_NAME).display());
}
