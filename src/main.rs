// SPDX-License-Identifier: MPL-2.0
use dicom_lens::app::{self, paths, Flags};
use std::path::PathBuf;

const HELP: &str = "\
DicomLens: view a DICOM image

USAGE:
  dicom_lens [OPTIONS] [FILE]

OPTIONS:
  --lang <ID>          Interface language (en-US, zh-TW)
  --config-dir <DIR>   Directory holding settings.toml
  -h, --help           Print this help

Set RUST_LOG=info (or debug) for log output.
";

fn main() -> iced::Result {
    env_logger::init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let flags = match parse_flags(&mut args) {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    paths::init_cli_overrides(flags.config_dir.clone());
    app::run(flags)
}

fn parse_flags(args: &mut pico_args::Arguments) -> Result<Flags, pico_args::Error> {
    let lang = args.opt_value_from_str("--lang")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let rest = std::mem::replace(args, pico_args::Arguments::from_vec(Vec::new()));
    let file_path = rest.finish().into_iter().next().map(PathBuf::from);

    Ok(Flags {
        lang,
        file_path,
        config_dir,
    })
}
