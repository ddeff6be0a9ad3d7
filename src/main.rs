use gash::Interpreter;

fn main() {
    env_logger::init();

    let mut shell = match Interpreter::new() {
        Ok(shell) => shell,
        Err(err) => {
            eprintln!("gash: {err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = shell.repl() {
        eprintln!("gash: {err:#}");
        std::process::exit(1);
    }
}
