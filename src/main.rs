mod error;
mod suffix;

use crate::error::{Endpoint, Error};
use crate::suffix::Suffix;

use clap::Parser;
use std::{
    fs::File,
    io::{self, Read, Write},
    process,
};

#[derive(Parser)]
#[clap(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = "Tool to calculate and append a DFU suffix to firmware images"
)]
struct Opts {
    /// Firmware image to read, or `-` for standard input.
    #[clap(default_value = "-")]
    file: String,
    /// Where to write the suffixed image, or `-` for standard output.
    #[clap(default_value = "-")]
    output: String,
    /// Vendor identifier, in hexadecimal.
    #[clap(long, default_value = "FFFF", parse(try_from_str = parse_hex))]
    vid: u16,
    /// Product identifier, in hexadecimal.
    #[clap(long, default_value = "FFFF", parse(try_from_str = parse_hex))]
    pid: u16,
    /// Device release number, in binary coded decimal hexadecimal.
    #[clap(long, default_value = "FFFF", parse(try_from_str = parse_hex))]
    bcd: u16,
}

fn parse_hex(raw: &str) -> Result<u16, Error> {
    u16::from_str_radix(raw, 16).map_err(|_| {
        Error::InvalidArgument(format!("`{}` is not a hexadecimal value in the 0-FFFF range", raw))
    })
}

fn read_image(path: &str) -> Result<Vec<u8>, Error> {
    let mut image = Vec::new();
    let result = match path {
        "-" => io::stdin().read_to_end(&mut image),
        path => File::open(path).and_then(|mut file| file.read_to_end(&mut image)),
    };
    result.map_err(|cause| Error::Io(Endpoint::Input, cause))?;
    Ok(image)
}

fn open_output(path: &str) -> Result<Box<dyn Write>, Error> {
    match path {
        "-" => Ok(Box::new(io::stdout())),
        path => File::create(path)
            .map(|file| Box::new(file) as Box<dyn Write>)
            .map_err(|cause| Error::Io(Endpoint::Output, cause)),
    }
}

fn run(opts: Opts) -> Result<(), Error> {
    let suffix =
        Suffix { vendor_id: opts.vid, product_id: opts.pid, bcd_version: opts.bcd };

    let image = read_image(&opts.file)?;
    let mut output = open_output(&opts.output)?;

    let crc = suffix::append(&suffix, &image, &mut output)
        .map_err(|cause| Error::Io(Endpoint::Output, cause))?;

    // Status goes to stderr; stdout may be the output sink.
    eprintln!("Appended DFU suffix to {} image bytes", image.len());
    eprintln!("Final CRC is {} (0x{:08x})", crc, crc);
    Ok(())
}

fn main() {
    match run(Opts::parse()) {
        Ok(()) => {}
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_options_accept_sixteen_bit_values() {
        assert_eq!(parse_hex("FFFF").ok(), Some(0xFFFF));
        assert_eq!(parse_hex("0100").ok(), Some(0x0100));
        assert_eq!(parse_hex("1a2b").ok(), Some(0x1A2B));
        assert_eq!(parse_hex("0").ok(), Some(0));
    }

    #[test]
    fn hex_options_reject_garbage_and_overflow() {
        assert!(parse_hex("zzzz").is_err());
        assert!(parse_hex("10000").is_err());
        assert!(parse_hex("").is_err());
        assert!(parse_hex("-1").is_err());
    }

    #[test]
    fn options_default_to_wildcard_identifiers_and_standard_streams() {
        let opts = Opts::try_parse_from(["dfu_suffix_tool"]).unwrap();
        assert_eq!(opts.vid, 0xFFFF);
        assert_eq!(opts.pid, 0xFFFF);
        assert_eq!(opts.bcd, 0xFFFF);
        assert_eq!(opts.file, "-");
        assert_eq!(opts.output, "-");
    }

    #[test]
    fn explicit_identifiers_are_parsed_base_sixteen() {
        let opts = Opts::try_parse_from([
            "dfu_suffix_tool",
            "--vid",
            "1234",
            "--pid",
            "5678",
            "--bcd",
            "0100",
            "image.bin",
            "suffixed.bin",
        ])
        .unwrap();
        assert_eq!(opts.vid, 0x1234);
        assert_eq!(opts.pid, 0x5678);
        assert_eq!(opts.bcd, 0x0100);
        assert_eq!(opts.file, "image.bin");
        assert_eq!(opts.output, "suffixed.bin");
    }

    #[test]
    fn invalid_hex_is_rejected_before_any_io() {
        assert!(Opts::try_parse_from(["dfu_suffix_tool", "--vid", "zzzz"]).is_err());
    }
}
