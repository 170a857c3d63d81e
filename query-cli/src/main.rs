//! 按别名执行 SQL 的命令行工具
//!
//! 从目录文件与密码文件解析别名，打开单个连接，执行内联 SQL 或 SQL 文件，
//! 以 JSON 输出结果，最后关闭连接。

use std::path::{Path, PathBuf};

use alias_resolver::AliasResolver;
use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use common::config::AliasPaths;
use common::models::QueryResult;
use connection_manager::{run_query, run_query_file, with_connection, TerminalPrompt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run SQL against a database named by alias.
#[derive(Debug, Parser)]
#[command(name = "dbalias", version, about)]
#[command(group(ArgGroup::new("sql").args(["command", "file"])))]
struct Cli {
    /// Alias from the catalog file.
    #[arg(required_unless_present = "list")]
    alias: Option<String>,

    /// Inline SQL to run.
    #[arg(short = 'c', long, required_unless_present_any = ["file", "list"])]
    command: Option<String>,

    /// File containing the SQL to run.
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Password file (default: ~/.pgpass).
    #[arg(long, value_name = "PATH")]
    pgpass: Option<PathBuf>,

    /// Catalog file (default: ~/db.conf).
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// List the aliases in the catalog and exit.
    #[arg(long)]
    list: bool,
}

/// Where the SQL comes from.
#[derive(Debug, PartialEq, Eq)]
enum SqlSource<'a> {
    Inline(&'a str),
    File(&'a Path),
}

impl Cli {
    fn sql(&self) -> Option<SqlSource<'_>> {
        match (&self.command, &self.file) {
            (Some(sql), _) => Some(SqlSource::Inline(sql)),
            (None, Some(file)) => Some(SqlSource::File(file)),
            (None, None) => None,
        }
    }

    fn paths(&self) -> AliasPaths {
        let mut paths = AliasPaths::default();
        if let Some(p) = &self.pgpass {
            paths = paths.with_password_file(p);
        }
        if let Some(p) = &self.catalog {
            paths = paths.with_catalog_file(p);
        }
        paths
    }
}

fn main() -> Result<()> {
    // 初始化日志追踪（默认 warn，可通过 RUST_LOG 覆盖）
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let paths = cli.paths();
    tracing::debug!(
        password_file = %paths.password_file.display(),
        catalog_file = %paths.catalog_file.display(),
        "alias files"
    );

    if cli.list {
        for alias in AliasResolver::new(paths).aliases()? {
            println!("{alias}");
        }
        return Ok(());
    }

    let alias = cli.alias.as_deref().context("alias is required")?;
    let sql = cli.sql().context("either --command or --file is required")?;
    tracing::debug!(alias, source = ?sql, "running sql");

    let result: QueryResult = with_connection(alias, &paths, &TerminalPrompt, |handle| match sql {
        SqlSource::Inline(sql) => run_query(handle, sql),
        SqlSource::File(file) => run_query_file(handle, file),
    })
    .with_context(|| format!("alias `{alias}`"))?;
    tracing::info!(
        alias,
        rows = result.row_count,
        affected = ?result.affected_rows,
        elapsed_ms = result.execution_time_ms,
        "query finished"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_and_file_conflict() {
        let parsed = Cli::try_parse_from(["dbalias", "db1", "-c", "SELECT 1", "-f", "q.sql"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_sql_required_without_list() {
        assert!(Cli::try_parse_from(["dbalias", "db1"]).is_err());
        let cli = Cli::try_parse_from(["dbalias", "db1", "-f", "q.sql"]).unwrap();
        assert_eq!(cli.sql(), Some(SqlSource::File(Path::new("q.sql"))));
        let cli = Cli::try_parse_from(["dbalias", "db1", "-c", "SELECT 1"]).unwrap();
        assert_eq!(cli.sql(), Some(SqlSource::Inline("SELECT 1")));
    }

    #[test]
    fn test_list_does_not_need_alias() {
        let cli = Cli::try_parse_from(["dbalias", "--list"]).unwrap();
        assert!(cli.list);
        assert!(cli.alias.is_none());
    }

    #[test]
    fn test_path_overrides() {
        let cli = Cli::try_parse_from([
            "dbalias",
            "db1",
            "-c",
            "SELECT 1",
            "--pgpass",
            "/tmp/pass",
            "--catalog",
            "/tmp/db.conf",
        ])
        .unwrap();
        assert_eq!(cli.paths(), AliasPaths::new("/tmp/pass", "/tmp/db.conf"));
    }
}
