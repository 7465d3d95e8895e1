use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::{mpsc::RecvTimeoutError, Arc},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use vm::{
    chip8::ChipSet,
    definitions::{cpu, display},
    devices::{DisplayCommands, RunState, SharedKeyboard, SoundCommands},
    resources::{Rom, RomArchives},
    runner::{self, Exit, Machine, Settings},
    timer::{TimedWorker, Worker},
};

/// How often the worker drives the machine.
const DRIVER_INTERVAL: Duration = Duration::from_millis(2);

/// How long the machine gets to come to a halt after it was asked to quit.
const QUIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Runs a chip8 program without any window and prints the last frame.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(help = "Path to the rom file, or to a zip archive of roms")]
    rom: PathBuf,

    #[arg(short, long, help = "Name of the rom inside of the zip archive")]
    archive_entry: Option<String>,

    #[arg(long, default_value_t = cpu::HERTZ, help = "Instructions per second")]
    hertz: u64,

    #[arg(short, long, default_value_t = 5, help = "Seconds to run the program for")]
    seconds: u64,

    #[arg(short, long, help = "Print the full machine state at the end")]
    dump: bool,
}

/// Keeps the last frame the machine handed out.
#[derive(Clone, Default)]
struct TerminalDisplay {
    frame: Arc<Mutex<Vec<Vec<bool>>>>,
    frames: Arc<Mutex<usize>>,
}

impl DisplayCommands for TerminalDisplay {
    fn display(&mut self, pixels: &[Vec<bool>]) {
        *self.frame.lock() = pixels.to_vec();
        *self.frames.lock() += 1;
    }
}

impl TerminalDisplay {
    fn render(&self) -> String {
        let frame = self.frame.lock();
        let border = format!("+{}+", "-".repeat(display::WIDTH));

        let mut res = String::with_capacity((display::WIDTH + 3) * (display::HEIGHT + 2));
        res.push_str(&border);
        res.push('\n');
        for row in frame.iter() {
            res.push('|');
            res.extend(row.iter().map(|&pixel| if pixel { '*' } else { ' ' }));
            res.push_str("|\n");
        }
        res.push_str(&border);
        res
    }
}

/// There is no speaker, the tone only shows up in the log.
struct LogSound;

impl SoundCommands for LogSound {
    fn set_tone(&mut self, on: bool) {
        log::debug!("tone {}", if on { "on" } else { "off" });
    }
}

fn load_rom(path: &Path, entry: Option<&str>) -> Result<Rom> {
    match entry {
        Some(entry) => {
            let file = File::open(path)
                .with_context(|| format!("Unable to open the archive {}", path.display()))?;
            let mut archive = RomArchives::new(BufReader::new(file))
                .with_context(|| format!("Unable to read the archive {}", path.display()))?;
            archive.get_file_data(entry).with_context(|| {
                format!(
                    "Unable to find the rom '{}', the archive contains {:?}",
                    entry,
                    archive.file_names()
                )
            })
        }
        None => Rom::from_path(path)
            .with_context(|| format!("Unable to read the rom {}", path.display())),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = load_rom(&args.rom, args.archive_entry.as_deref())?;
    let chip = ChipSet::new(rom).context("Unable to load the rom")?;

    let settings = Settings {
        cpu_hertz: args.hertz,
        ..Settings::default()
    };

    let display = TerminalDisplay::default();
    let keyboard = SharedKeyboard::new();
    let machine = Machine::new(chip, settings, display.clone(), keyboard.clone(), LogSound)
        .context("Unable to set up the machine")?;

    let (mut worker, receiver) = runner::run::<Worker, _, _, _>(machine, DRIVER_INTERVAL);

    let exit = match receiver.recv_timeout(Duration::from_secs(args.seconds)) {
        Ok(exit) => exit,
        Err(RecvTimeoutError::Timeout) => {
            keyboard.set_run_state(RunState::Quit);
            receiver
                .recv_timeout(QUIT_TIMEOUT)
                .context("The machine did not stop")?
        }
        Err(RecvTimeoutError::Disconnected) => bail!("The machine stopped unexpectedly"),
    };
    worker.stop();

    log::info!("Rendered {} frames", *display.frames.lock());
    println!("{}", display.render());

    let (chip, fault) = match exit {
        Exit::Quit(chip) => (chip, None),
        Exit::Fault(chip, fault) => (chip, Some(fault)),
    };

    if args.dump {
        println!("{}", chip);
    }

    match fault {
        Some(fault) => Err(fault).context(format!("The program '{}' halted", chip.get_name())),
        None => Ok(()),
    }
}
