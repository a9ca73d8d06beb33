use std::process;

use getopts::Options;

pub struct Args {
    pub url: String,
    pub seasons: Vec<String>,
    pub groups: Vec<String>,
    pub all_groups: bool,
    pub list: bool,
    pub json: bool,
    pub time_zone: Option<String>,
}

pub enum Command {
    Help(String),
    Run(Args),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optmulti(
        "s",
        "season",
        "Season to include, e.g. 2019-20 (repeatable) [Default: all seasons]",
        "SEASON",
    );
    opts.optmulti(
        "g",
        "group",
        "Group to include besides events for everyone (repeatable)",
        "GROUP",
    );
    opts.optflag("a", "all-groups", "Include events for every group");
    opts.optflag(
        "l",
        "list",
        "List the seasons and groups found in the feed, then exit",
    );
    opts.optflag("j", "json", "Print the calendar as JSON");
    opts.optopt(
        "z",
        "time-zone",
        "Time zone to render events in [Default: America/New_York]",
        "TZ",
    );
    opts
}

fn usage(opts: &Options) -> String {
    opts.usage(&format!(
        "Usage: {} [options] <webcal-url>",
        env!("CARGO_PKG_NAME")
    ))
}

pub fn try_parse(args: &[String]) -> Result<Command, String> {
    let opts = opts();
    let matches = opts.parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        return Ok(Command::Help(usage(&opts)));
    }

    let url = match matches.free.as_slice() {
        [url] => url.clone(),
        [] => return Err("missing webcal URL".to_string()),
        _ => return Err("expected exactly one webcal URL".to_string()),
    };

    Ok(Command::Run(Args {
        url,
        seasons: matches.opt_strs("season"),
        groups: matches.opt_strs("group"),
        all_groups: matches.opt_present("all-groups"),
        list: matches.opt_present("list"),
        json: matches.opt_present("json"),
        time_zone: matches.opt_str("time-zone"),
    }))
}

pub fn parse(args: Vec<String>) -> Args {
    match try_parse(&args) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help(text)) => {
            println!("{text}");
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", usage(&opts()));
            process::exit(1);
        }
    }
}
