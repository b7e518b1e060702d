//! LED Bridge Control Tool
//!
//! CLI bridge between an operator and a microcontroller-driven LED strip,
//! plus a wrapper around `arduino-cli` for building and uploading the strip
//! firmware.

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ledbridge_proto::{parse_color, Board, Rgb};
use ledbridge_serial::{select_operation, Controller, LedRequest, SerialTransport};
use ledbridge_toolchain::ToolchainService;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::{env_setting, resolve, Config};

#[derive(Parser)]
#[command(name = "ledbridge")]
#[command(about = "Control tool for serial LED strips and their firmware")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level passed through to arduino-cli (default: info)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Configuration file path (default: ./ledbridge.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a command to the LED strip
    Led(LedArgs),
    /// Compile a sketch for a board
    Compile {
        /// Sketch name under boards/<board>/sketches/
        sketch: String,

        /// Board name (e.g. arduino-uno-r4)
        #[arg(long)]
        board: Option<String>,
    },
    /// Compile-free upload of a sketch to a board
    Upload {
        /// Sketch name under boards/<board>/sketches/
        sketch: String,

        /// Board name (e.g. arduino-uno-r4)
        #[arg(long)]
        board: Option<String>,

        /// Serial port to upload over
        #[arg(long)]
        port: Option<String>,
    },
    /// Install a board's platform core and libraries
    Install {
        /// Board name; omit to only refresh the package indexes
        #[arg(long)]
        board: Option<String>,
    },
    /// Show the arduino-cli version
    Version,
    /// List installed platform cores
    Cores,
    /// List installed libraries
    Libs,
    /// List known boards
    Boards,
}

#[derive(Args)]
struct LedArgs {
    /// Turn the strip on
    #[arg(long)]
    on: bool,

    /// Turn the strip off
    #[arg(long)]
    off: bool,

    /// Blink with the given color (requires --color)
    #[arg(long, requires = "color")]
    blink: bool,

    /// Color name or r,g,b triple
    #[arg(long)]
    color: Option<String>,

    /// Second color for an alternating blink
    #[arg(long)]
    color2: Option<String>,

    /// Rainbow cycle
    #[arg(long)]
    rainbow: bool,

    /// Blink or rainbow interval in milliseconds
    #[arg(long)]
    interval: Option<i64>,

    /// Serial port path
    #[arg(long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// Board name (selects the protocol variant)
    #[arg(long)]
    board: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Led(args) => handle_led(args, &config).await,
        Commands::Compile { sketch, board } => {
            let board = lookup_board(board.as_deref(), &config)?;
            let service = toolchain_service(cli.log_level.as_deref())?;
            let output = service.compile(&sketch, &board).await?;
            println!("{}", output);
            println!("Compiled {} for {}", sketch, board.name);
            Ok(())
        }
        Commands::Upload {
            sketch,
            board,
            port,
        } => {
            let board = lookup_board(board.as_deref(), &config)?;
            let port = resolve(port, env_setting("LEDBRIDGE_PORT"), config.port.clone());
            let service = toolchain_service(cli.log_level.as_deref())?;
            let output = service.upload(&sketch, &board, &port).await?;
            println!("{}", output);
            println!("Uploaded {} to {} on {}", sketch, board.name, port);
            Ok(())
        }
        Commands::Install { board } => {
            let board = match board {
                Some(name) => Some(lookup_board(Some(&name), &config)?),
                None => None,
            };
            let service = toolchain_service(cli.log_level.as_deref())?;
            let output = service.install(board.as_ref()).await?;
            println!("{}", output);
            Ok(())
        }
        Commands::Version => {
            let service = toolchain_service(cli.log_level.as_deref())?;
            println!("{}", service.version().await?);
            Ok(())
        }
        Commands::Cores => {
            let service = toolchain_service(cli.log_level.as_deref())?;
            println!("{}", service.list_cores().await?);
            Ok(())
        }
        Commands::Libs => {
            let service = toolchain_service(cli.log_level.as_deref())?;
            println!("{}", service.list_libs().await?);
            Ok(())
        }
        Commands::Boards => {
            println!("Known boards:");
            for board in Board::builtin() {
                println!("  {} ({:?}, fqbn: {})", board.name, board.protocol, board.fqbn);
            }
            Ok(())
        }
    }
}

async fn handle_led(args: LedArgs, config: &Config) -> Result<()> {
    let board = lookup_board(args.board.as_deref(), config)?;
    let port = resolve(
        args.port.clone(),
        env_setting("LEDBRIDGE_PORT"),
        config.port.clone(),
    );
    let baud = resolve(args.baud, env_setting("LEDBRIDGE_BAUD"), config.baud);

    let request = LedRequest {
        on: args.on,
        off: args.off,
        blink: args.blink,
        color: parse_color_arg(args.color.as_deref())?,
        color2: parse_color_arg(args.color2.as_deref())?,
        rainbow: args.rainbow,
        interval: args.interval,
    };

    // Resolve the operation up front so an empty or inconsistent request
    // fails before the port is opened.
    select_operation(&request)
        .map_err(|e| anyhow::anyhow!("{e}. Use --on, --off, --blink, --color or --rainbow"))?;
    debug!(
        "Dispatching to {} ({} baud, board {})",
        port, baud, board.name
    );

    let controller = Controller::new(SerialTransport, &port, baud, board.protocol);
    let encoded = controller
        .run(&request)
        .await
        .with_context(|| format!("Failed to drive the LED strip on {}", port))?;

    println!("Sent: {}", encoded.command);
    if let Some(advisory) = encoded.advisory {
        println!("Note: {}", advisory);
    }
    Ok(())
}

fn parse_color_arg(arg: Option<&str>) -> Result<Option<Rgb>> {
    match arg {
        Some(text) => {
            let rgb = parse_color(text)
                .with_context(|| format!("'{text}' is not a color name or r,g,b triple"))?;
            Ok(Some(rgb))
        }
        None => Ok(None),
    }
}

fn lookup_board(flag: Option<&str>, config: &Config) -> Result<Board> {
    let name = resolve(
        flag.map(str::to_string),
        env_setting("LEDBRIDGE_BOARD"),
        config.board.clone(),
    );
    Board::find(&name).with_context(|| {
        let known: Vec<String> = Board::builtin().into_iter().map(|b| b.name).collect();
        format!("Unknown board '{}'. Known boards: {}", name, known.join(", "))
    })
}

fn toolchain_service(
    log_level: Option<&str>,
) -> Result<ToolchainService<ledbridge_toolchain::StdFs, ledbridge_toolchain::ShellExecutor>> {
    let workdir = std::env::current_dir().context("Cannot determine working directory")?;
    Ok(ToolchainService::new(workdir, log_level))
}
