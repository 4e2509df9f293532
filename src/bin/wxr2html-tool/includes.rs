use std::io;
use std::path::{Path, PathBuf};

use wxr2html::util::fs_helper::{list_files, write_file};
use wxr2html::view::{FOOTER_INCLUDES, HEAD_INCLUDES};

use crate::IncludesArgs;

struct Includes {
    head: String,
    footer: String,
    stylesheets: usize,
    scripts: usize,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn asset_url(path: &Path) -> String {
    let parts: Vec<String> = path.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    format!("{{{{base_path}}}}assets/{}", parts.join("/"))
}

/// `files` are relative to the assets directory and already sorted.
fn render_includes(files: &[PathBuf]) -> Includes {
    let mut includes = Includes {
        head: String::new(),
        footer: String::new(),
        stylesheets: 0,
        scripts: 0,
    };

    for file in files {
        if has_extension(file, "css") {
            includes.head.push_str(&format!("  <link rel=\"stylesheet\" href=\"{}\">\n", asset_url(file)));
            includes.stylesheets += 1;
        } else if has_extension(file, "js") {
            includes.footer.push_str(&format!("<script src=\"{}\" defer></script>\n", asset_url(file)));
            includes.scripts += 1;
        }
    }

    includes
}

fn write_includes(assets_dir: &Path, template_dir: &Path) -> io::Result<Includes> {
    let files = list_files(assets_dir)?;
    let includes = render_includes(&files);
    write_file(&template_dir.join(HEAD_INCLUDES), includes.head.as_bytes())?;
    write_file(&template_dir.join(FOOTER_INCLUDES), includes.footer.as_bytes())?;
    Ok(includes)
}

pub fn includes_cmd(args: IncludesArgs) {
    let assets_dir = PathBuf::from(&args.assets_dir);
    let template_dir = PathBuf::from(&args.template_dir);

    match write_includes(&assets_dir, &template_dir) {
        Ok(includes) => println!("Wrote {} stylesheets and {} scripts to {}",
                                 includes.stylesheets, includes.scripts, template_dir.display()),
        Err(e) => eprintln!("Error generating includes from {}: {}", assets_dir.display(), e),
    }
}
