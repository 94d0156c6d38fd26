//! CLI entry point (§4.8, §6.5): `asrs [options] <files...>` wires the CLI
//! flags to a resource config, an optional symbol database, and the
//! lex → parse → compile pipeline, then reports diagnostics TypeScript-style
//! and exits reflecting whether any error/fatal diagnostic was emitted.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as _;

use asrs::cli::{parse_override, Cli};
use asrs::config::ResourceConfig;
use asrs::diagnostics::{global, Code, Level, Message, Position};
use asrs::host::{CompilerHost, FileSystemCompilerHost};
use asrs::options::OptionSet;
use asrs::symbols::SymbolDatabase;

fn main() -> ExitCode {
    let cli = Cli::parse();

    global().set_callback(Some(Box::new(|diagnostic| println!("{diagnostic}"))));
    if cli.quiet {
        global().set_current_level(Level::Error);
    }

    if cli.init {
        return init_project();
    }

    let host = FileSystemCompilerHost;
    let project_name = current_project_name(&host);

    let mut options = OptionSet::new();
    for raw in &cli.overrides {
        match parse_override(raw) {
            Ok((option, value)) => options.set(option, value),
            Err(message) => eprintln!("asrs: {message}"),
        }
    }

    let rc = match &cli.rc {
        Some(path) => ResourceConfig::load_file(path, global()),
        None => ResourceConfig::load(&project_name, global()),
    };

    if cli.show_config {
        show_config(&rc, &options);
        return ExitCode::SUCCESS;
    }

    let db_path = cli.db.clone().or_else(|| rc.db.clone().map(PathBuf::from));
    let db = db_path.as_ref().map(|path| SymbolDatabase::load(path, global()));

    if cli.files.is_empty() {
        eprintln!("asrs: no input files");
        return ExitCode::FAILURE;
    }

    compile_files(&cli.files, &host, &options, db.as_ref())
}

fn current_project_name(host: &dyn CompilerHost) -> String {
    Path::new(&host.get_current_directory())
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asrs".to_string())
}

fn compile_files(
    files: &[PathBuf],
    host: &dyn CompilerHost,
    options: &OptionSet,
    db: Option<&SymbolDatabase>,
) -> ExitCode {
    for file in files {
        let path = file.display().to_string();
        let Some(source) = host.read_file(&path) else {
            Message::new(Level::Error, Code::InvalidData, Position::new(path.as_str()), global())
                .append_str("cannot read file")
                .emit();
            continue;
        };

        let _ = asrs::compile_source_with_database(&path, &source, options, global(), db);
    }

    // A single cumulative check rather than summing each file's own
    // error count: diagnostics below a file's own checker pass (lexer,
    // parser recovery) are recorded only on the process-wide sink, so the
    // exit code has to reflect the whole pipeline, not just the last stage.
    if global().error_count() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn show_config(rc: &ResourceConfig, options: &OptionSet) {
    println!("scripts: {:?}", rc.scripts);
    println!("db: {:?}", rc.db);
    println!("temporary_variable_name: {}", rc.temporary_variable_name);
    for option in asrs::options::Option_::ALL {
        println!("{option}: {}", options.get(option));
    }
}

fn init_project() -> ExitCode {
    let starter = "{\n  'scripts': '.',\n  'db': 'symbols.json',\n  'temporary_variable_name': '__temp'\n}\n";
    match std::fs::write("project.rc", starter) {
        Ok(()) => {
            println!("wrote project.rc");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("asrs: could not write project.rc: {error}");
            ExitCode::FAILURE
        }
    }
}
