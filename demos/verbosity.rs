use optwise::{Action, Opt, OptionParser, ParseError, Value};

fn main() {
    let mut parser = OptionParser::new("verbosity")
        .add(
            Opt::new(["-v"])
                .action(Action::Count)
                .dest("verbosity")
                .help("increase the verbosity (repeatable)"),
        )
        .add(
            Opt::new(["--verbosity"])
                .kind("int")
                .callback(|option, opt_str, value, parser| match value {
                    Some(Value::Int(level)) if *level >= 0 => {
                        parser.values_mut().set("verbosity", *level);
                        Ok(())
                    }
                    _ => Err(ParseError::usage(format!(
                        "{opt_str} must be a non-negative level ({})",
                        option
                    ))),
                })
                .metavar("LEVEL")
                .help("set the verbosity to LEVEL"),
        )
        .add(
            Opt::new(["-I", "--include"])
                .action(Action::Append)
                .metavar("DIR")
                .help("add DIR to the search path"),
        )
        .default("verbosity", 0)
        .build();

    let (values, args) = parser.parse();
    println!("{values}");
    println!("args: {args:?}");
}
