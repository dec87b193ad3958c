use clap::{App, Arg};
use env_logger::Env;
use log::error;
use nbt2json_tools::{convert, io_paths, read_input, write_output, Options, Result};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let matches = App::new("nbt2json")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts NBT-encoded data to JSON or YAML, and back")
        .arg(
            Arg::with_name("reverse")
                .long("reverse")
                .short("r")
                .alias("json2nbt")
                .help("Convert JSON or YAML to NBT instead"),
        )
        .arg(
            Arg::with_name("gzip")
                .long("gzip")
                .short("z")
                .help("Compress output with gzip"),
        )
        .arg(
            Arg::with_name("comment")
                .long("comment")
                .short("c")
                .takes_value(true)
                .value_name("COMMENT")
                .help("Add a comment to the JSON or YAML output"),
        )
        .arg(
            Arg::with_name("big-endian")
                .long("big-endian")
                .short("b")
                .aliases(&["java", "big", "pc"])
                .help("Use Java Edition's big-endian numbers. Default is Bedrock's little-endian"),
        )
        .arg(
            Arg::with_name("little-endian")
                .long("little-endian")
                .short("l")
                .aliases(&["little", "mcpe"])
                .conflicts_with("big-endian")
                .help("Use Bedrock Edition's little-endian numbers. This is the default"),
        )
        .arg(
            Arg::with_name("in")
                .long("in")
                .short("i")
                .takes_value(true)
                .value_name("FILE")
                .default_value("-")
                .help("Input file path, - for stdin"),
        )
        .arg(
            Arg::with_name("out")
                .long("out")
                .short("o")
                .takes_value(true)
                .value_name("FILE")
                .default_value("-")
                .help("Output file path, - for stdout"),
        )
        .arg(
            Arg::with_name("nbt-file")
                .long("nbt-file")
                .short("n")
                .takes_value(true)
                .value_name("FILE")
                .help("NBT file path: the input, or the output with --reverse. Overrides --in or --out"),
        )
        .arg(
            Arg::with_name("json-file")
                .long("json-file")
                .short("j")
                .takes_value(true)
                .value_name("FILE")
                .help("JSON or YAML file path: the output, or the input with --reverse. Overrides --in or --out"),
        )
        .arg(
            Arg::with_name("yaml")
                .long("yaml")
                .short("y")
                .alias("yml")
                .help("Use YAML instead of JSON"),
        )
        .arg(
            Arg::with_name("skip")
                .long("skip")
                .takes_value(true)
                .value_name("NUM")
                .default_value("0")
                .help("Skip NUM bytes of NBT input. For Bedrock level.dat, use --skip 8 to bypass the header"),
        )
        .arg(
            Arg::with_name("long-as-string")
                .long("long-as-string")
                .short("s")
                .help("Write Long values as decimal strings instead of valueLeast/valueMost"),
        )
        .get_matches();

    let skip = match matches.value_of("skip").unwrap_or("0").parse::<usize>() {
        Ok(skip) => skip,
        Err(e) => {
            error!("invalid --skip: {}", e);
            std::process::exit(1);
        }
    };

    let opts = Options {
        reverse: matches.is_present("reverse"),
        yaml: matches.is_present("yaml"),
        gzip: matches.is_present("gzip"),
        comment: matches.value_of("comment").map(str::to_owned),
        skip,
        ..Default::default()
    }
    .big_endian(matches.is_present("big-endian"))
    .long_as_string(matches.is_present("long-as-string"));

    let (input, output) = io_paths(
        opts.reverse,
        matches.value_of("nbt-file"),
        matches.value_of("json-file"),
        matches.value_of("in").unwrap_or("-"),
        matches.value_of("out").unwrap_or("-"),
    );

    if let Err(e) = run(input, output, &opts) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(input: &str, output: &str, opts: &Options) -> Result<()> {
    let data = read_input(input)?;
    let converted = convert(data, opts)?;
    write_output(output, &converted)
}
