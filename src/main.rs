use std::io::{BufRead, Write};

use anyhow::Error;
use clap::Parser;
use countonme::{keys, EngineError, ExpressionEngine, Key, Notification, Recorder};

mod logging;

type Engine = ExpressionEngine<Recorder>;

#[derive(Debug, Parser)]
#[command(name = "countonme", version, about = "Four-operator keypad calculator")]
struct Cli {
    /// Keys to type, e.g. `2+3×4`. The expression is evaluated after the
    /// last key. Without keys, every line of stdin is a calculation.
    keys: Vec<String>,

    /// Print the expression after every key
    #[arg(short, long)]
    trace: bool,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when the calculation given as arguments was rejected.
fn run(cli: &Cli) -> Result<bool, Error> {
    let mut engine = ExpressionEngine::new(Recorder::default());

    let stdout = std::io::stdout();
    let lock = stdout.lock();
    let mut w = std::io::BufWriter::new(lock);

    if !cli.keys.is_empty() {
        let input = cli.keys.join(" ");
        let keys = keys(&input).collect::<Result<Vec<_>, _>>()?;
        let solved = calculate(&mut engine, &keys, cli.trace, &mut w)?;
        w.flush()?;
        return Ok(solved);
    }

    let stdin = std::io::stdin();
    let reader = std::io::BufReader::new(stdin);
    let is_interactive = atty::is(atty::Stream::Stdin);

    if is_interactive {
        write!(&mut w, ">>> ")?;
        w.flush()?;
    }

    for line in reader.lines() {
        match keys(&line?).collect::<Result<Vec<_>, _>>() {
            Ok(keys) => {
                calculate(&mut engine, &keys, cli.trace, &mut w)?;
            }
            Err(e) => {
                w.flush()?;
                eprintln!("{}", e);
            }
        }

        if is_interactive {
            write!(&mut w, ">>> ")?;
        }
        w.flush()?;
    }
    w.flush()?;

    Ok(true)
}

/// Types `keys` into a fresh expression, evaluating at the end unless `=`
/// already produced a result. Returns whether there is a result.
fn calculate(
    engine: &mut Engine,
    keys: &[Key],
    trace: bool,
    w: &mut impl Write,
) -> Result<bool, Error> {
    engine.clear();
    let _ = engine.presenter_mut().drain();

    for key in keys {
        let _ = press(engine, key);
        report(engine, trace, w)?;
    }
    if !engine.expression().has_result() {
        let _ = engine.evaluate();
        report(engine, trace, w)?;
    }

    writeln!(w, "{}", engine.expression())?;
    Ok(engine.expression().has_result())
}

fn press(engine: &mut Engine, key: &Key) -> Result<(), EngineError> {
    match key {
        Key::Digit(digit) => engine.append_number(digit),
        Key::Operator(op) => engine.append_operator(*op),
        Key::Equals => engine.evaluate(),
        Key::Clear => {
            engine.clear();
            Ok(())
        }
    }
}

fn report(engine: &mut Engine, trace: bool, w: &mut impl Write) -> Result<(), Error> {
    for notification in engine.presenter_mut().drain() {
        match notification {
            Notification::OperationChanged(expression) => {
                if trace {
                    writeln!(w, "  {}", expression)?;
                }
            }
            Notification::Error(error) => {
                w.flush()?;
                eprintln!("error: {}", error);
            }
        }
    }
    Ok(())
}
