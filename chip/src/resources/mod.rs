use std::{
    fs,
    io::{self, prelude::*},
    path::Path,
};
use zip::{read::ZipArchive, result::ZipResult};

use crate::definitions::cpu;

/// Represents an archive of roms, the archive can come out of anything that
/// can be read from, a file or the bytes of an embedded archive.
pub struct RomArchives<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> RomArchives<R> {
    /// Will open the given zip archive.
    pub fn new(reader: R) -> ZipResult<Self> {
        Ok(RomArchives {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Will return all the rom names available to be chosen
    pub fn file_names(&self) -> Vec<&'_ str> {
        self.archive.file_names().collect()
    }

    /// Will decompress the rom with the given name from the zip archive
    pub fn get_file_data(&mut self, name: &str) -> ZipResult<Rom> {
        let mut file = self.archive.by_name(name)?;
        let mut data = Vec::with_capacity(capacity_hint(file.size()));
        file.read_to_end(&mut data)?;
        Ok(Rom::new(name, data))
    }
}

/// The size an archive claims for an entry is not trusted any further than a
/// rom could ever be long.
fn capacity_hint(declared: u64) -> usize {
    declared.min(cpu::PROGRAM_SIZE as u64) as usize
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Represents a single rom with it's information
pub struct Rom {
    /// The rom name
    name: String,
    /// The program image stored as a u8 slice on the heap
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data
    pub fn new<D: Into<Box<[u8]>>>(name: &str, data: D) -> Self {
        Rom {
            name: name.to_string(),
            data: data.into(),
        }
    }

    /// Will read the rom out of the given file, the file name is used as the
    /// rom name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!("Read the rom '{}' with {} bytes", name, data.len());
        Ok(Rom::new(&name, data))
    }

    /// Will return a slice internal values of the given data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zip::{write::FileOptions, ZipWriter};

    const ROM_NAMES: [&str; 3] = ["IBMLOGO", "MAZE", "PONG"];

    /// The first few instructions of the maze program.
    const MAZE_DATA: [u8; 8] = [0xA2, 0x1E, 0xC2, 0x01, 0x32, 0x01, 0xA2, 0x1A];

    fn build_archive() -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for name in ROM_NAMES.iter().rev() {
            writer
                .start_file(*name, FileOptions::default())
                .expect("Unable to start the archive entry.");
            let data: &[u8] = if *name == "MAZE" { &MAZE_DATA } else { &[0x00, 0xE0] };
            writer.write_all(data).expect("Unable to write the archive entry.");
        }
        let mut cursor = writer.finish().expect("Unable to finish the archive.");
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn test_rom_extract() {
        let mut ra = RomArchives::new(build_archive()).unwrap();
        let rom = ra.get_file_data("MAZE").unwrap();

        assert_eq!(rom.get_name(), "MAZE");
        assert_eq!(rom.get_data(), &MAZE_DATA[..]);
    }

    #[test]
    fn test_capacity_hint() {
        assert_eq!(capacity_hint(MAZE_DATA.len() as u64), MAZE_DATA.len());
        assert_eq!(capacity_hint(cpu::PROGRAM_SIZE as u64), cpu::PROGRAM_SIZE);
        // a header claiming gigabytes only gets the size of the program space
        assert_eq!(capacity_hint(u32::MAX as u64), cpu::PROGRAM_SIZE);
        assert_eq!(capacity_hint(u64::MAX), cpu::PROGRAM_SIZE);
    }

    #[test]
    fn test_missing_rom() {
        let mut ra = RomArchives::new(build_archive()).unwrap();
        assert!(ra.get_file_data("TETRIS").is_err());
    }

    #[test]
    fn test_file_names() {
        let ra = RomArchives::new(build_archive()).unwrap();
        let mut files = ra.file_names();
        files.sort_unstable();

        assert_eq!(&ROM_NAMES, &files[..]);
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!("chip8-vm-rom-{}", std::process::id()));
        fs::write(&path, &MAZE_DATA).unwrap();

        let rom = Rom::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(rom.get_data(), &MAZE_DATA[..]);
        assert!(rom.get_name().starts_with("chip8-vm-rom-"));
    }
}
