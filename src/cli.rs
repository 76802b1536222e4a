//! Interface de linha de comando do Convert Buddy baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (convert, status,
//! targets, health) e flags globais (--api-base, --poll-interval-ms, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Convert Buddy — envia arquivos para conversão e acompanha o job até o fim.
#[derive(Debug, Parser)]
#[command(name = "convert-buddy", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// URL base da API (sobrepõe arquivo e ambiente).
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Intervalo entre consultas de status, em milissegundos.
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Habilita logs detalhados (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Envia arquivos para conversão e acompanha o progresso.
    Convert {
        /// Arquivos de entrada. Conversões de arquivo único usam só o primeiro.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Conversão desejada (ex.: pdf->jpg). Veja `convert-buddy targets`.
        #[arg(long, short)]
        target: Option<String>,

        /// Opções em JSON (ex.: '{"dpi":300}'). JSON inválido é enviado como {}.
        #[arg(long, short, default_value = "")]
        options: String,

        /// Diretório onde salvar o resultado ao final.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Imprime um resumo em JSON em vez da barra de progresso.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Consulta o status atual de um job.
    Status {
        /// Identificador do job.
        job_id: String,

        /// Imprime a view em JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Lista as conversões disponíveis.
    Targets,

    /// Verifica se a API está pronta.
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_convert_subcommand() {
        let cli = Cli::parse_from([
            "convert-buddy",
            "convert",
            "-t",
            "jpg->pdf",
            "-o",
            r#"{"dpi":300}"#,
            "p1.jpg",
            "p2.jpg",
        ]);
        match cli.command {
            Command::Convert {
                files,
                target,
                options,
                output,
                json,
            } => {
                assert_eq!(files, [PathBuf::from("p1.jpg"), PathBuf::from("p2.jpg")]);
                assert_eq!(target.as_deref(), Some("jpg->pdf"));
                assert_eq!(options, r#"{"dpi":300}"#);
                assert!(output.is_none());
                assert!(!json);
            }
            _ => panic!("expected Convert command"),
        }
    }

    #[test]
    fn convert_requires_files() {
        assert!(Cli::try_parse_from(["convert-buddy", "convert"]).is_err());
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "convert-buddy",
            "--api-base",
            "http://h",
            "--poll-interval-ms",
            "250",
            "--verbose",
            "targets",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.api_base.as_deref(), Some("http://h"));
        assert_eq!(cli.poll_interval_ms, Some(250));
        assert!(matches!(cli.command, Command::Targets));
    }

    #[test]
    fn cli_parses_status_subcommand() {
        let cli = Cli::parse_from(["convert-buddy", "status", "job-1", "--json"]);
        match cli.command {
            Command::Status { job_id, json } => {
                assert_eq!(job_id, "job-1");
                assert!(json);
            }
            _ => panic!("expected Status command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
