use optwise::{Action, Opt, OptionGroup, OptionParser, Value};

fn main() {
    let mut parser = OptionParser::new("file_reader")
        .usage("%prog [options] [PATTERN...]")
        .description("Read lines from FILE, and print those matching any PATTERN.")
        .version("%prog 1.0")
        .add(
            Opt::new(["-f", "--file"])
                .metavar("FILE")
                .help("read from FILE [default: %default]"),
        )
        .add(
            Opt::new(["-q", "--quiet"])
                .action(Action::StoreFalse)
                .dest("verbose")
                .help("don't print status messages"),
        )
        .add(
            Opt::new(["-m", "--mode"])
                .kind("choice")
                .choices(["plain", "numbered"])
                .help("output mode, one of plain or numbered [default: %default]"),
        )
        .group(
            OptionGroup::new("Limits")
                .description("Stop reading early.")
                .option(
                    Opt::new(["-n", "--max-lines"])
                        .kind("int")
                        .metavar("N")
                        .help("stop after N lines"),
                ),
        )
        .default("file", "-")
        .default("verbose", true)
        .default("mode", "plain")
        .build();

    let (values, patterns) = parser.parse();
    let file = values.get("file").and_then(Value::as_str).unwrap_or("-");

    if values.get("verbose").and_then(Value::as_bool).unwrap_or(true) {
        println!("Reading '{file}' with patterns {patterns:?}.");
    }

    let max_lines = values.get("max_lines").and_then(Value::as_int);
    let mode = values.get("mode").and_then(Value::as_str).unwrap_or("plain");
    println!("mode: {mode}, max lines: {max_lines:?}");
}
