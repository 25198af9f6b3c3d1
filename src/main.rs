use std::{fs, process, rc::Rc, thread, time::Duration};

use clap::Parser;
use tbl::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::evaluate, environment::Environment},
        value::core::Value,
    },
};

/// tbl is a small expression language with runtime definable operators,
/// complex numbers and macros.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells tbl to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode automatically prints the value of the last statement.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Skips the standard library; only the native builtins are available.
    #[arg(short, long)]
    no_stdlib: bool,

    contents: String,
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry().with(fmt::layer().with_target(true).with_level(true))
                                      .with(EnvFilter::from_default_env())
                                      .init();
    }
}

/// Installs the capabilities the language core leaves to its host.
fn register_host(env: &Rc<Environment>) {
    env.register_builtin("print", |args, _env| {
           let line = args.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
           println!("{line}");
           Ok(args.last().cloned().unwrap_or_default())
       });

    env.register_builtin("load", |args, env| {
           let [path] = args.as_slice() else {
               return Err(RuntimeError::ArgumentCountMismatch { expected: "1".to_string(),
                                                                found:    args.len(), });
           };
           let path = path.as_text("the path given to load")?;
           let source = fs::read_to_string(&path).map_err(|e| {
                                                      RuntimeError::invalid_argument(format!("can not read '{path}': {e}"))
                                                  })?;
           tracing::debug!(%path, "loading script");
           evaluate(&source, env)
       });

    env.register_builtin("sleep", |args, _env| {
           let [seconds] = args.as_slice() else {
               return Err(RuntimeError::ArgumentCountMismatch { expected: "1".to_string(),
                                                                found:    args.len(), });
           };
           let seconds = seconds.as_real("the duration given to sleep")?;
           let duration = Duration::try_from_secs_f64(seconds).map_err(|e| {
                                                                   RuntimeError::invalid_argument(format!("can not sleep for {seconds} seconds: {e}"))
                                                               })?;
           thread::sleep(duration);
           Ok(Value::default())
       });
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            process::exit(1);
        })
    } else {
        args.contents
    };

    let env = if args.no_stdlib {
        Environment::with_builtins()
    } else {
        Environment::standard().unwrap_or_else(|e| {
                                   eprintln!("Failed to load the standard library: {e}");
                                   process::exit(1);
                               })
    };
    register_host(&env);

    match evaluate(&script, &env) {
        Ok(value) if args.pipe_mode => println!("{value}"),
        Ok(_) => {},
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        },
    }
}
