//! Build script: render the `hsqldb-run` man page for packaging.

use std::{env, fs, io, path::PathBuf};
use time::{OffsetDateTime, format_description::well_known::Iso8601};

const FALLBACK_DATE: &str = "1970-01-01";

fn manual_date() -> String {
    let Ok(raw) = env::var("SOURCE_DATE_EPOCH") else {
        return FALLBACK_DATE.into();
    };
    let parsed = raw
        .parse::<i64>()
        .ok()
        .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok())
        .and_then(|date| date.format(&Iso8601::DATE).ok());
    parsed.unwrap_or_else(|| {
        println!(
            "cargo:warning=Ignoring SOURCE_DATE_EPOCH '{raw}'; using {FALLBACK_DATE} instead"
        );
        FALLBACK_DATE.into()
    })
}

fn man_dir() -> PathBuf {
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".into());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".into());
    // OUT_DIR is target/<profile>/build/<crate>-<hash>/out.
    let base = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .and_then(|out| out.ancestors().nth(4).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("target"));
    base.join(format!("generated-man/{target}/{profile}"))
}

fn write_page(contents: &str, dir: &std::path::Path, page: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let staged = dir.join(format!("{page}.tmp"));
    fs::write(&staged, contents)?;
    fs::rename(&staged, dir.join(page))
}

fn render(binary: &str, version: &str, date: &str) -> String {
    let title = binary.to_uppercase();
    format!(
        ".TH \"{title}\" \"1\" \"{date}\" \"{binary} {version}\" \"HSQLDB Launcher\"\n\
.SH NAME\n\
{binary} \\- start an HSQLDB server for integration tests\n\
.SH SYNOPSIS\n\
.B {binary}\n\
[\\fB--mode\\fR server|webserver] [\\fB--db-name\\fR NAME] [\\fB--port\\fR N]\n\
[\\fB--is-transient\\fR true|false] [\\fB--delete-on-entry\\fR true|false]\n\
[\\fB--delete-on-exit\\fR true|false] [\\fB--silent\\fR true|false]\n\
.SH DESCRIPTION\n\
{binary} runs an HSQLDB Server or WebServer in a child JVM, registers one\n\
database, and keeps it running until SIGTERM, SIGINT, SIGQUIT or SIGHUP.\n\
Files left by earlier runs can be deleted before start, and the database\n\
artefacts can be deleted once the server stops.\n\
.SH ENVIRONMENT\n\
Every option can also be set through an \\fBHSQLDB_\\fR prefixed variable,\n\
for example \\fBHSQLDB_DB_NAME\\fR.\n"
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for variable in [
        "CARGO_PKG_VERSION",
        "CARGO_BIN_NAME",
        "SOURCE_DATE_EPOCH",
        "TARGET",
        "PROFILE",
    ] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    let binary = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "hsqldb-run".into());
    let version = env::var("CARGO_PKG_VERSION")
        .map_err(|_| "CARGO_PKG_VERSION must be set by Cargo to render the manual page")?;
    let page = format!("{binary}.1");
    let contents = render(&binary, &version, &manual_date());

    write_page(&contents, &man_dir(), &page)?;
    if let Some(out_dir) = env::var_os("OUT_DIR")
        && let Err(error) = write_page(&contents, &PathBuf::from(&out_dir), &page)
    {
        println!("cargo:warning=Failed to stage manual page in OUT_DIR: {error}");
    }
    Ok(())
}
