#![allow(clippy::uninlined_format_args)]

use hostregex::{backends, Error, Flags, Limits, Regex, Registers};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "hostregex-tool")]
struct Opt {
    /// The regular expression.
    pattern: String,

    /// The flags of the regular expression, like "extended|icase".
    #[structopt(long, short)]
    flags: Option<Flags>,

    /// Optimize the IR.
    #[structopt(long, short, takes_value = false)]
    optimize: bool,

    /// Dump the unoptimized IR to stdout
    #[structopt(long)]
    dump_unoptimized_ir: bool,

    /// Dump the optimized IR to stdout
    #[structopt(long)]
    dump_optimized_ir: bool,

    /// Dump the bytecode to stdout.
    #[structopt(long)]
    dump_bytecode: bool,

    /// Dump all regular expression compilation phases to stdout.
    #[structopt(long)]
    dump_phases: bool,

    /// Cap on the backtrack stack depth.
    #[structopt(long)]
    max_depth: Option<usize>,

    /// The input values to match against.
    #[structopt(conflicts_with_all = &["bench", "file"])]
    inputs: Vec<String>,

    /// Match against the contents of a file.
    #[structopt(long, conflicts_with_all = &["bench", "inputs"])]
    file: Option<PathBuf>,

    /// Benchmark the matches of the given file.
    #[structopt(long, conflicts_with_all = &["file", "inputs"])]
    bench: Option<PathBuf>,
}

/// Format the registers of a match, one span per group.
fn format_registers(regs: &Registers, input: &str) -> String {
    let mut result = String::new();
    for (idx, span) in regs.iter().enumerate() {
        if idx > 0 {
            result.push_str(", ");
        }
        match span {
            Some(r) => result.push_str(&format!(
                "{}: \"{}\" ({}..{})",
                idx,
                &input[r.clone()],
                r.start,
                r.end
            )),
            None => result.push_str(&format!("{}: (-1..-1)", idx)),
        }
    }
    result
}

/// Walk every non-overlapping match of \p re in \p input.
/// \return the number of matches.
fn for_each_match<F>(re: &Regex, input: &str, limits: &Limits, mut f: F) -> Result<usize, Error>
where
    F: FnMut(&Registers),
{
    let mut regs = Registers::new();
    let mut pos = 0;
    let mut count = 0;
    while pos <= input.len() && re.search_with_limits(input, pos, limits, &mut regs)? {
        count += 1;
        f(&regs);
        let overall = match regs.get(0) {
            Some(r) => r,
            None => break,
        };
        pos = if overall.is_empty() {
            match input[overall.end..].chars().next() {
                Some(c) => overall.end + c.len_utf8(),
                None => break,
            }
        } else {
            overall.end
        };
    }
    Ok(count)
}

fn exec_re_on_string(re: &Regex, input: &str, limits: &Limits) {
    let mut first = None;
    let res = for_each_match(re, input, limits, |regs| {
        if first.is_none() {
            first = Some(format_registers(regs, input));
        }
    });
    match (res, first) {
        (Ok(count), Some(first)) => println!("Match: {}, total: {}", first, count),
        (Ok(_), None) => println!("No match"),
        (Err(err), _) => println!("{}", err),
    }
}

fn bench_re_on_path(re: &Regex, path: &Path, limits: &Limits) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            println!("{}: {}", err, path.display());
            return;
        }
    };
    let input = contents.as_str();
    let run = || for_each_match(re, input, limits, |_| {});
    // Warmup
    if let Err(err) = run() {
        println!("{}", err);
        return;
    }
    let start = Instant::now();
    for _ in 0..25 {
        let _ = run();
    }
    let duration = start.elapsed();
    println!("{} ms", duration.as_millis());
}

fn main() -> Result<(), Error> {
    let args = Opt::from_args();

    let flags = args.flags.unwrap_or_default();
    let mut ire = backends::try_parse(&args.pattern, flags)?;
    if args.dump_phases || args.dump_unoptimized_ir {
        println!("Unoptimized IR:\n{}", ire);
    }

    if args.optimize {
        backends::optimize(&mut ire);
        if args.dump_phases || args.dump_optimized_ir {
            println!("Optimized IR:\n{}", ire);
        }
    }

    let re = backends::compile(&args.pattern, flags, args.optimize)?;
    if args.dump_phases || args.dump_bytecode {
        if let Some(bytecode) = backends::dump_bytecode(&re) {
            println!("Bytecode:\n{}", bytecode);
        }
    }

    let mut limits = Limits::default();
    if let Some(depth) = args.max_depth {
        limits.max_backtrack_depth = depth;
    }

    if let Some(ref path) = args.file {
        match fs::read_to_string(path) {
            Ok(contents) => exec_re_on_string(&re, contents.as_str(), &limits),
            Err(err) => println!("{}: {}", err, path.display()),
        };
    } else if let Some(ref path) = args.bench {
        bench_re_on_path(&re, path, &limits);
    } else {
        for input in args.inputs {
            exec_re_on_string(&re, &input, &limits);
        }
    }
    Ok(())
}
