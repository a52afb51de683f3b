use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    hsqldb_launcher::run(std::env::args_os(), &mut io::stderr())
}
