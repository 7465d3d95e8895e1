//! The pretty print implementation of the [`ChipSet`](super::ChipSet).
//! This implementation was split up into this file for smaller file sizes and higher
//! cohesion.

use super::ChipSet;
use crate::definitions::{cpu, memory};
use num_traits::Unsigned;
use once_cell::sync::Lazy;
use std::fmt::{self, Write};

/// The amount of entries shown on a single line, has to be bigger then 2.
const HEX_PRINT_STEP: usize = 8;

const END_OF_LINE: char = '\n';
const INDENT_FILLAMENT: char = '\t';
const INDENT_SIZE: usize = 2;

/// The values that are used for a block of zeros.
const FILLER_BASE: &str = "...";

const PIXEL_ON: char = '*';
const PIXEL_OFF: char = ' ';
const DISPLAY_BORDER: char = '|';

/// Will add an indent post processing
fn indent_helper(text: &mut String, indent: usize) {
    for _ in 0..indent {
        text.push(INDENT_FILLAMENT);
    }
}

/// will format all integer types, 2 symbols for the prefix (0x) and 4 for
/// the value
fn integer_formatter<T>(line: &mut String, data: T) -> fmt::Result
where
    T: fmt::UpperHex + Unsigned,
{
    write!(line, "{:#06X}", data)
}

/// will format the pointers of a line
fn pointer_formatter(line: &mut String, from: usize, to: usize) -> fmt::Result {
    write!(line, "{:#06X} - {:#06X} :", from, to)
}

/// The width of a single formatted integer.
static INTEGER_LEN: Lazy<usize> = Lazy::new(|| {
    let mut line = String::new();
    match integer_formatter(&mut line, 0u8) {
        Ok(()) => line.len(),
        Err(_) => 0,
    }
});

/// Prepares the line that will be used for a row only made up of zeros.
static ZERO_FILLER: Lazy<String> = Lazy::new(|| {
    let mut formatted = String::new();
    if integer_formatter(&mut formatted, 0u16).is_err() {
        return FILLER_BASE.to_string();
    }
    let length = formatted.len() * (HEX_PRINT_STEP - 2) + (HEX_PRINT_STEP - 1) - FILLER_BASE.len();
    let filler = " ".repeat(length / 2);

    format!(
        "{}{}{}{}{}",
        formatted, filler, FILLER_BASE, filler, formatted
    )
});

/// A single line of the memory dump, holding the opcodes of the memory region
/// `from..=to`.
struct Row {
    from: usize,
    to: usize,
    data: Vec<u16>,
}

impl Row {
    fn only_null(&self) -> bool {
        self.data.iter().all(|opcode| *opcode == 0)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut res = String::new();
        pointer_formatter(&mut res, self.from, self.to)?;
        res.push(' ');

        if self.only_null() {
            res.push_str(&ZERO_FILLER);
        } else {
            let mut entries = self.data.iter();
            if let Some(first) = entries.next() {
                integer_formatter(&mut res, *first)?;
            }
            for entry in entries {
                res.push(' ');
                integer_formatter(&mut res, *entry)?;
            }
        }
        write!(f, "{}", res)
    }
}

/// will pretty print the content of the raw memory as opcodes, consecutive rows
/// of zeros are merged into one.
fn memory_printer(memory: &[u8], indent: usize) -> Result<String, fmt::Error> {
    const POINTER_INCREMENT: usize = HEX_PRINT_STEP * memory::opcodes::SIZE;

    let mut rows: Vec<Row> = Vec::with_capacity(memory.len() / POINTER_INCREMENT);

    for (index, chunk) in memory.chunks(POINTER_INCREMENT).enumerate() {
        let from = index * POINTER_INCREMENT;
        let data = chunk
            .chunks(memory::opcodes::SIZE)
            .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or_default()]))
            .collect();

        let mut row = Row {
            from,
            to: from + chunk.len() - 1,
            data,
        };

        if row.only_null() {
            if let Some(last_row) = rows.last() {
                if last_row.only_null() {
                    row.from = last_row.from;
                    rows.pop();
                }
            }
        }
        rows.push(row);
    }

    let mut res = String::new();
    for row in rows {
        indent_helper(&mut res, indent);
        write!(res, "{}{}", row, END_OF_LINE)?;
    }
    res.pop();
    Ok(res)
}

/// will pretty print all the integer data given
fn integer_printer<T>(data: &[T], indent: usize) -> Result<String, fmt::Error>
where
    T: fmt::UpperHex + Unsigned + Copy,
{
    let mut res = String::new();
    for (index, chunk) in data.chunks(HEX_PRINT_STEP).enumerate() {
        let from = index * HEX_PRINT_STEP;
        indent_helper(&mut res, indent);
        pointer_formatter(&mut res, from, from + chunk.len() - 1)?;

        for entry in chunk {
            res.push(' ');
            integer_formatter(&mut res, *entry)?;
        }
        res.push(END_OF_LINE);
    }
    res.pop();
    Ok(res)
}

/// will pretty print the boolean data given, padded to the width of an integer
fn bool_printer(data: &[bool], indent: usize) -> Result<String, fmt::Error> {
    let mut res = String::new();
    for (index, chunk) in data.chunks(HEX_PRINT_STEP).enumerate() {
        let from = index * HEX_PRINT_STEP;
        indent_helper(&mut res, indent);
        pointer_formatter(&mut res, from, from + chunk.len() - 1)?;

        let mut line = String::new();
        for value in chunk {
            line.push(' ');
            write!(line, "{:width$}", value, width = *INTEGER_LEN)?;
        }
        res.push_str(line.trim_end());
        res.push(END_OF_LINE);
    }
    res.pop();
    Ok(res)
}

/// will draw the frame, a set pixel is shown as `*`
fn display_printer(display: &[Vec<bool>], indent: usize) -> String {
    let mut res = String::new();
    for row in display {
        indent_helper(&mut res, indent);
        res.push(DISPLAY_BORDER);
        res.extend(row.iter().map(|&pixel| if pixel { PIXEL_ON } else { PIXEL_OFF }));
        res.push(DISPLAY_BORDER);
        res.push(END_OF_LINE);
    }
    res.pop();
    res
}

/// a single indented value
fn value_printer<T>(data: T) -> Result<String, fmt::Error>
where
    T: fmt::UpperHex + Unsigned,
{
    let mut res = String::new();
    indent_helper(&mut res, INDENT_SIZE);
    integer_formatter(&mut res, data)?;
    Ok(res)
}

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // prepare the rom name
        let mut nam = String::new();
        indent_helper(&mut nam, INDENT_SIZE);
        nam.push_str(self.rom.get_name());

        let opc = value_printer(self.opcode)?;
        let prc = value_printer(self.program_counter)?;
        let idx = value_printer(self.index_register)?;
        let del = value_printer(self.delay_timer.get_value())?;
        let sou = value_printer(self.sound_timer.get_value())?;
        let mem = memory_printer(&self.memory, INDENT_SIZE)?;
        let key = bool_printer(self.keyboard.get_keys(), INDENT_SIZE)?;

        // the stack is filled up, so it always has the same size
        let mut stack = [0u16; cpu::stack::SIZE];
        stack[..self.stack.len()].copy_from_slice(&self.stack);
        let sta = integer_printer(&stack, INDENT_SIZE)?;
        let stp = value_printer(self.stack.len())?;

        let reg = integer_printer(&self.registers, INDENT_SIZE)?;
        let dis = display_printer(&self.display, INDENT_SIZE);

        let mut fau = String::new();
        indent_helper(&mut fau, INDENT_SIZE);
        match &self.fault {
            Some(fault) => write!(fau, "{}", fault)?,
            None => fau.push_str("none"),
        }

        write!(
            f,
            "Chipset {{\n\
                \tProgram Name :\n{}\n\
                \tOpcode :\n{}\n\
                \tProgram Counter :\n{}\n\
                \tIndex Register :\n{}\n\
                \tDelay Timer :\n{}\n\
                \tSound Timer :\n{}\n\
                \tMemory :\n{}\n\
                \tKeyboard :\n{}\n\
                \tStack Pointer :\n{}\n\
                \tStack :\n{}\n\
                \tRegister :\n{}\n\
                \tDisplay :\n{}\n\
                \tFault :\n{}\n\
                }}",
            nam, opc, prc, idx, del, sou, mem, key, stp, sta, reg, dis, fau
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests;
    use crate::definitions::{display, keyboard};

    const OUTPUT_HEAD: &str = "\
        Chipset {\n\
            \tProgram Name :\n\
                \t\tDEFAULT\n\
            \tOpcode :\n\
                \t\t0x0000\n\
            \tProgram Counter :\n\
                \t\t0x0200\n\
            \tIndex Register :\n\
                \t\t0x0000\n\
            \tDelay Timer :\n\
                \t\t0x0000\n\
            \tSound Timer :\n\
                \t\t0x0000\n\
            \tMemory :\n\
                \t\t0x0000 - 0x004F : 0x0000                    ...                    0x0000\n\
                \t\t0x0050 - 0x005F : 0xF090 0x9090 0xF020 0x6020 0x2070 0xF010 0xF080 0xF0F0\n\
                \t\t0x0060 - 0x006F : 0x10F0 0x10F0 0x9090 0xF010 0x10F0 0x80F0 0x10F0 0xF080\n\
                \t\t0x0070 - 0x007F : 0xF090 0xF0F0 0x1020 0x4040 0xF090 0xF090 0xF0F0 0x90F0\n\
                \t\t0x0080 - 0x008F : 0x10F0 0xF090 0xF090 0x90E0 0x90E0 0x90E0 0xF080 0x8080\n\
                \t\t0x0090 - 0x009F : 0xF0E0 0x9090 0x90E0 0xF080 0xF080 0xF0F0 0x80F0 0x8080\n\
                \t\t0x00A0 - 0x01FF : 0x0000                    ...                    0x0000\n\
                \t\t0x0200 - 0x020F : 0x00E0 0x6C00 0xA20A 0xD015 0x1208 0xF090 0x9090 0xF000\n\
                \t\t0x0210 - 0x0FFF : 0x0000                    ...                    0x0000\n\
            \tKeyboard :\n\
                \t\t0x0000 - 0x0007 : false  true   false  true   false  true   false  true\n\
                \t\t0x0008 - 0x000F : false  true   false  true   false  true   false  true\n\
            \tStack Pointer :\n\
                \t\t0x0000\n\
            \tStack :\n\
                \t\t0x0000 - 0x0007 : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
                \t\t0x0008 - 0x000F : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
            \tRegister :\n\
                \t\t0x0000 - 0x0007 : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
                \t\t0x0008 - 0x000F : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
            \tDisplay :";

    #[test]
    /// tests if the pretty print output is as expected
    fn test_full_print() {
        let mut chip = tests::get_default_chip();
        let mut keys = [false; keyboard::SIZE];

        for (index, key) in keys.iter_mut().enumerate() {
            *key = index % 2 != 0;
        }

        chip.set_keyboard(&keys);

        // override the chip register as they are generated randomly
        chip.registers.fill(0);

        let actual_full = format!("{}", chip);
        let mut actual = actual_full.split('\n');

        for exp in OUTPUT_HEAD.split('\n') {
            assert_eq!(Some(exp), actual.next());
        }

        let empty_row = format!("\t\t|{}|", " ".repeat(display::WIDTH));
        for _ in 0..display::HEIGHT {
            assert_eq!(Some(empty_row.as_str()), actual.next());
        }

        assert_eq!(Some("\tFault :"), actual.next());
        assert_eq!(Some("\t\tnone"), actual.next());
        assert_eq!(Some("}"), actual.next());
        assert_eq!(None, actual.next());
    }

    #[test]
    fn test_print_frame() {
        let mut chip = tests::get_default_chip();
        chip.registers.fill(0);
        // run the clear, load, set index and draw instruction of the rom
        for _ in 0..4 {
            chip.next().unwrap();
        }

        let printed = format!("{}", chip);
        let frame: Vec<&str> = printed
            .lines()
            .filter(|line| line.starts_with("\t\t|"))
            .collect();

        assert_eq!(frame.len(), display::HEIGHT);
        assert!(frame[0].starts_with("\t\t|****  "));
        assert!(frame[1].starts_with("\t\t|*  *  "));
        assert!(frame[4].starts_with("\t\t|****  "));
        assert_eq!(frame[5], format!("\t\t|{}|", " ".repeat(display::WIDTH)));
    }
}
