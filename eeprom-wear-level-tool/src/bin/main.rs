use std::path::PathBuf;

use clap::{
    Args,
    Parser,
    Subcommand,
};
use eeprom_wear_level::{
    RegionConfig,
    WriteOutcome,
};
use eeprom_wear_level_tool::{
    ByteOrder,
    EepromImage,
};

#[derive(Parser)]
#[command(name = "eeprom-wear-level-tool")]
#[command(about = "Inspect and modify wear leveled counters in EEPROM dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a blank (all zero) EEPROM image
    Create {
        /// Output image file path
        output: PathBuf,

        /// Image size in bytes
        #[arg(short, long, value_parser = parse_number::<usize>)]
        size: usize,
    },
    /// Print the recovered counter and every record of the region
    Inspect {
        /// Input image file path
        input: PathBuf,

        #[command(flatten)]
        region: RegionArgs,
    },
    /// Export all records of the region to a CSV file
    Export {
        /// Input image file path
        input: PathBuf,

        /// Output CSV file path
        output: PathBuf,

        #[command(flatten)]
        region: RegionArgs,
    },
    /// Write a counter value into the image
    Write {
        /// Image file path, modified in place
        image: PathBuf,

        /// Counter value
        #[arg(value_parser = parse_number::<u64>)]
        value: u64,

        #[command(flatten)]
        region: RegionArgs,
    },
    /// Zero the region
    Clear {
        /// Image file path, modified in place
        image: PathBuf,

        #[command(flatten)]
        region: RegionArgs,
    },
    /// Zero the whole image
    Wipe {
        /// Image file path, modified in place
        image: PathBuf,
    },
}

#[derive(Args)]
struct RegionArgs {
    /// First address of the region
    #[arg(long, default_value_t = 0, value_parser = parse_number::<u32>)]
    min: u32,

    /// Last address of the region, defaults to the end of the image
    #[arg(long, value_parser = parse_number::<u32>)]
    max: Option<u32>,

    /// Bytes per record
    #[arg(long, default_value_t = 4)]
    record_size: u8,

    /// Values above the ceiling reset the region
    #[arg(long, value_parser = parse_number::<u64>)]
    ceiling: Option<u64>,

    /// Byte order of the records
    #[arg(long, value_enum, default_value_t = ByteOrder::Big)]
    byte_order: ByteOrder,
}

impl RegionArgs {
    fn config(&self) -> RegionConfig {
        RegionConfig {
            min_address: self.min,
            max_address: self.max,
            record_size: self.record_size,
            overflow_ceiling: self.ceiling,
        }
    }
}

fn parse_number<T: TryFrom<u64>>(s: &str) -> Result<T, String> {
    let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| e.to_string())?
    } else {
        s.parse::<u64>().map_err(|e| e.to_string())?
    };
    T::try_from(value).map_err(|_| format!("{s} is out of range"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create { output, size } => {
            EepromImage::new(size)?.to_file(&output)?;
            println!("Created blank image: {} ({} bytes)", output.display(), size);
            Ok(())
        }
        Commands::Inspect { input, region } => {
            println!("Reading image: {}", input.display());
            let mut image = EepromImage::from_file(&input)?;
            let report =
                eeprom_wear_level_tool::inspect(&mut image, region.config(), region.byte_order)?;

            println!(
                "Region: {:#06x}..={:#06x}, {} byte records, {} slots, ceiling {}",
                report.region.min_address(),
                report.region.max_address(),
                report.region.record_size(),
                report.region.slot_count(),
                report.region.overflow_ceiling(),
            );
            match report.cursor {
                Some(cursor) => println!("Highest value: {} @{:#06x}", report.highest, cursor),
                None => println!("Region is empty"),
            }
            for record in &report.records {
                let marker = if record.cursor { "*" } else { " " };
                println!(
                    "{marker} {:#06x}  {:>20}  {}",
                    record.address, record.value, record.raw
                );
            }
            Ok(())
        }
        Commands::Export {
            input,
            output,
            region,
        } => {
            println!("Reading image: {}", input.display());
            let mut image = EepromImage::from_file(&input)?;
            let report =
                eeprom_wear_level_tool::inspect(&mut image, region.config(), region.byte_order)?;
            println!("Found {} records", report.records.len());

            report.to_csv_file(&output)?;
            println!("Successfully exported records to: {}", output.display());
            Ok(())
        }
        Commands::Write {
            image: path,
            value,
            region,
        } => {
            let mut image = EepromImage::from_file(&path)?;
            let outcome = eeprom_wear_level_tool::write_value(
                &mut image,
                region.config(),
                region.byte_order,
                value,
            )?;

            match outcome {
                WriteOutcome::Written { address } => {
                    println!("Wrote {value} to {address:#06x}")
                }
                WriteOutcome::RejectedStale { highest } => {
                    println!("Not written, {value} is not greater than {highest}")
                }
                WriteOutcome::ResetPerformed => {
                    println!("{value} exceeds the ceiling, region cleared")
                }
            }
            image.to_file(&path)?;
            Ok(())
        }
        Commands::Clear {
            image: path,
            region,
        } => {
            let mut image = EepromImage::from_file(&path)?;
            eeprom_wear_level_tool::clear_range(&mut image, region.config())?;
            image.to_file(&path)?;
            println!("Cleared region of {}", path.display());
            Ok(())
        }
        Commands::Wipe { image: path } => {
            let mut image = EepromImage::from_file(&path)?;
            eeprom_wear_level_tool::clear_whole_storage(&mut image)?;
            image.to_file(&path)?;
            println!("Wiped {} ({} bytes)", path.display(), image.len());
            Ok(())
        }
    }
}
