#![forbid(unsafe_code)]

//! soapsig CLI: verify WS-Security signed SOAP envelopes.

use clap::{Parser, Subcommand};
use soapsig_core::{algorithm, Error};
use soapsig_dsig::{locate, VerifyContext, VerifyResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(
    name = "soapsig",
    about = "Verify WS-Security signed SOAP envelopes (exc-c14n, SHA-1, RSA-SHA1)",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the signature of a SOAP envelope
    Verify {
        /// Input XML file
        file: PathBuf,

        /// Signer's X.509 certificate or RSA public key (PEM or DER)
        #[arg(long)]
        cert: PathBuf,

        /// Keep blank text nodes when canonicalizing
        #[arg(long = "keep-blanks")]
        keep_blanks: bool,

        /// InclusiveNamespaces prefix for SignedInfo (default: soap)
        #[arg(long = "inclusive-prefix")]
        inclusive_prefix: Vec<String>,

        /// Reject envelopes that declare other algorithms
        #[arg(long = "strict-algorithms")]
        strict_algorithms: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the canonical form of an element and its digest
    C14n {
        /// Input XML file
        file: PathBuf,

        /// wsu:Id of the element (default: SignedInfo)
        #[arg(long)]
        id: Option<String>,

        /// InclusiveNamespaces prefix
        #[arg(long = "inclusive-prefix")]
        inclusive_prefix: Vec<String>,

        /// Keep blank text nodes
        #[arg(long = "keep-blanks")]
        keep_blanks: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the supported algorithms
    Info,
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Verify { verbose, .. } | Commands::C14n { verbose, .. } => *verbose,
        Commands::Info => false,
    };
    init_logging(verbose);

    let result = match cli.command {
        Commands::Verify {
            file,
            cert,
            keep_blanks,
            inclusive_prefix,
            strict_algorithms,
            verbose,
        } => cmd_verify(
            file,
            cert,
            keep_blanks,
            inclusive_prefix,
            strict_algorithms,
            verbose,
        ),

        Commands::C14n {
            file,
            id,
            inclusive_prefix,
            keep_blanks,
            verbose: _,
        } => cmd_c14n(file, id, inclusive_prefix, keep_blanks),

        Commands::Info => cmd_info(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(2);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn cmd_verify(
    file: PathBuf,
    cert: PathBuf,
    keep_blanks: bool,
    inclusive_prefix: Vec<String>,
    strict_algorithms: bool,
    verbose: bool,
) -> Result<(), Error> {
    let xml = read_file(&file)?;
    let certificate = soapsig_keys::load_certificate_file(&cert)?;

    let mut ctx = VerifyContext::new()
        .with_strip_blank_text(!keep_blanks)
        .with_enforce_declared_algorithms(strict_algorithms);
    if !inclusive_prefix.is_empty() {
        ctx = ctx.with_signed_info_prefixes(inclusive_prefix);
    }

    if verbose {
        eprintln!("Verifying: {}", file.display());
        eprintln!(
            "Signer: {} ({} bit RSA)",
            certificate.subject().unwrap_or("bare public key"),
            certificate.key_bits()
        );
        if let Some(der) = certificate.der() {
            eprintln!("SHA-1 fingerprint: {}", soapsig_crypto::digest::sha1_base64(der));
        }
    }

    let doc = soapsig_xml::parse(&xml)?;
    match ctx.verify_detailed(&doc, &certificate)? {
        VerifyResult::Valid => {
            println!("OK");
            Ok(())
        }
        VerifyResult::Invalid(failure) => {
            eprintln!("INVALID: {failure}");
            process::exit(1);
        }
    }
}

fn cmd_c14n(
    file: PathBuf,
    id: Option<String>,
    inclusive_prefix: Vec<String>,
    keep_blanks: bool,
) -> Result<(), Error> {
    let xml = read_file(&file)?;
    let doc = soapsig_xml::parse(&xml)?;
    let ctx = VerifyContext::new().with_strip_blank_text(!keep_blanks);

    let (node, mut options) = match &id {
        Some(id) => {
            let ids = locate::wsu_ids(&doc);
            (ids.resolve(&doc, id)?, ctx.reference_c14n())
        }
        None => (locate::signed_info(&doc)?, ctx.signed_info_c14n()),
    };
    if !inclusive_prefix.is_empty() {
        options = options.with_inclusive_prefixes(inclusive_prefix);
    }

    let canonical = soapsig_c14n::canonicalize_with(node, &options)?;
    write_output(&canonical)?;
    eprintln!("DigestValue: {}", soapsig_crypto::digest::sha1_base64(&canonical));
    Ok(())
}

fn cmd_info() -> Result<(), Error> {
    println!("soapsig: WS-Security XML-DSig verification");
    println!();
    println!("Canonicalization:");
    println!("  {} ({})", display_name(algorithm::EXC_C14N), algorithm::EXC_C14N);
    println!();
    println!("Digest:");
    println!("  {} ({})", display_name(algorithm::SHA1), algorithm::SHA1);
    println!();
    println!("Signature:");
    println!("  {} ({})", display_name(algorithm::RSA_SHA1), algorithm::RSA_SHA1);
    println!();
    println!("References: same-document #id resolved against wsu:Id");
    println!("Certificates: X.509 or SubjectPublicKeyInfo, PEM or DER (RSA keys)");
    Ok(())
}

// ── Utility functions ────────────────────────────────────────────────

fn display_name(uri: &str) -> &'static str {
    algorithm::name(uri).unwrap_or("unknown")
}

fn read_file(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display()))))
}

fn write_output(data: &[u8]) -> Result<(), Error> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(data)?;
    stdout.flush()?;
    Ok(())
}
