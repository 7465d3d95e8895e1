use crate::{
    definitions::{cpu, display, keyboard, memory},
    opcode::{ChipOpcodes, Operation, ProgramCounterStep},
    MemoryError, ProcessError,
};

use super::ChipSet;

impl ChipOpcodes for ChipSet {
    fn clear(&mut self) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        // 00E0
        // clear display
        for row in self.display.iter_mut() {
            for coloumn in row.iter_mut() {
                *coloumn = false;
            }
        }
        self.display_changed = true;
        Ok((ProgramCounterStep::Next, Operation::Draw))
    }

    fn ret(&mut self) -> Result<ProgramCounterStep, ProcessError> {
        // 00EE
        // Return from sub routine => pop from stack
        let pc = self.pop_stack()?;
        log::trace!("return to {:#06X}", pc);
        Ok(ProgramCounterStep::Jump(pc as usize))
    }

    fn jump(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError> {
        // 1NNN
        // Jumps to address NNN.
        Ok(ProgramCounterStep::Jump(nnn as usize))
    }

    fn call(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError> {
        // 2NNN
        // Calls subroutine at NNN, the program counter already points at the
        // instruction to return to.
        self.push_stack(self.program_counter)?;
        Ok(ProgramCounterStep::Jump(nnn as usize))
    }

    fn skip_eq_imm(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 3XNN
        // Skips the next instruction if VX equals NN. (Usually the next instruction is a jump to
        // skip a code block)
        Ok(ProgramCounterStep::cond(self.registers[x] == nn))
    }

    fn skip_neq_imm(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 4XNN
        // Skips the next instruction if VX doesn't equal NN.
        Ok(ProgramCounterStep::cond(self.registers[x] != nn))
    }

    fn skip_eq_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 5XY0
        // Skips the next instruction if VX equals VY.
        Ok(ProgramCounterStep::cond(
            self.registers[x] == self.registers[y],
        ))
    }

    fn load_imm(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 6XNN
        // Sets VX to NN.
        self.registers[x] = nn;
        Ok(ProgramCounterStep::Next)
    }

    fn add_imm(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 7XNN
        // Adds NN to VX. (Carry flag is not changed)
        self.registers[x] = self.registers[x].wrapping_add(nn);
        Ok(ProgramCounterStep::Next)
    }

    fn assign(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 8XY0
        self.registers[x] = self.registers[y];
        Ok(ProgramCounterStep::Next)
    }

    fn or(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 8XY1
        self.registers[x] |= self.registers[y];
        Ok(ProgramCounterStep::Next)
    }

    fn and(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 8XY2
        self.registers[x] &= self.registers[y];
        Ok(ProgramCounterStep::Next)
    }

    fn xor(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 8XY3
        self.registers[x] ^= self.registers[y];
        Ok(ProgramCounterStep::Next)
    }

    fn add_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 8XY4
        // Adds VY to VX. VF is set to 1 when there's a carry, and to 0 when there isn't.
        // The flag is written last, so it wins for X = F.
        let (res, carry) = self.registers[x].overflowing_add(self.registers[y]);
        self.registers[x] = res;
        self.registers[cpu::register::LAST] = carry as u8;
        Ok(ProgramCounterStep::Next)
    }

    fn sub_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 8XY5
        // VY is subtracted from VX. VF is set to 1 when VX > VY, and to 0 otherwise.
        let (left, right) = (self.registers[x], self.registers[y]);
        self.registers[x] = left.wrapping_sub(right);
        self.registers[cpu::register::LAST] = (left > right) as u8;
        Ok(ProgramCounterStep::Next)
    }

    fn shift_right(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 8XY6
        // Stores the least significant bit of VX in VF and then shifts VX to the right
        // by 1.
        let value = self.registers[x];
        self.registers[x] = value >> 1;
        self.registers[cpu::register::LAST] = value & 0x1;
        Ok(ProgramCounterStep::Next)
    }

    fn subn_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 8XY7
        // Sets VX to VY minus VX. VF is set to 1 when VY >= VX, and to 0 otherwise.
        let (left, right) = (self.registers[y], self.registers[x]);
        self.registers[x] = left.wrapping_sub(right);
        self.registers[cpu::register::LAST] = (left >= right) as u8;
        Ok(ProgramCounterStep::Next)
    }

    fn shift_left(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 8XYE
        // Stores the most significant bit of VX in VF and then shifts VX to the left by 1.
        const SHIFT_SIGNIFICANT: u8 = 7;
        let value = self.registers[x];
        self.registers[x] = value << 1;
        self.registers[cpu::register::LAST] = value >> SHIFT_SIGNIFICANT;
        Ok(ProgramCounterStep::Next)
    }

    fn skip_neq_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 9XY0
        // Skips the next instruction if VX doesn't equal VY.
        Ok(ProgramCounterStep::cond(
            self.registers[x] != self.registers[y],
        ))
    }

    fn set_index(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError> {
        // ANNN
        // Sets I to the address NNN.
        self.index_register = nnn;
        Ok(ProgramCounterStep::Next)
    }

    fn jump_offset(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError> {
        // BNNN
        // Jumps to the address NNN plus V0.
        let to = nnn as usize + self.registers[0] as usize;
        if to >= memory::SIZE {
            return Err(MemoryError::OutOfBounds {
                address: to,
                len: memory::opcodes::SIZE,
            }
            .into());
        }
        Ok(ProgramCounterStep::Jump(to))
    }

    fn random(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError> {
        // CXNN
        // Sets VX to the result of a bitwise and operation on a random number (Typically: 0 to 255)
        // and NN.

        // using a fill bytes call here, as the trait RngCore does not
        // support random u8.
        let mut rand: [u8; 1] = [0];
        self.rng.fill_bytes(&mut rand);
        self.registers[x] = nn & rand[0];
        Ok(ProgramCounterStep::Next)
    }

    fn draw(
        &mut self,
        x: usize,
        y: usize,
        n: usize,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        // DXYN
        // Draws a sprite at coordinate (VX, VY) that has a width of 8 pixels and a height of N
        // pixels. Each row of 8 pixels is read as bit-coded starting from memory location I; I
        // value doesn’t change after the execution of this instruction. VF is set to 1 if any
        // screen pixels are flipped from set to unset when the sprite is drawn, and to 0 if that
        // doesn’t happen.
        // The start position wraps around the screen, the sprite itself is clipped at the edges.
        if n == 0 {
            return Ok((ProgramCounterStep::Next, Operation::None));
        }

        let rows = self.memory_range(self.index_register as usize, n)?;
        let coorx = self.registers[x] as usize % display::WIDTH;
        let coory = self.registers[y] as usize % display::HEIGHT;

        const BYTE: usize = 8;

        let mut collision = false;
        let mut changed = false;

        for (i, row) in self.memory[rows].iter().enumerate() {
            let py = coory + i;

            if py >= display::HEIGHT {
                break;
            }

            // the most significant bit is the left most pixel
            for (m, j) in (0..BYTE).rev().zip(0..BYTE) {
                let px = coorx + j;

                if px >= display::WIDTH {
                    break;
                }

                if (*row >> m) & 0x1 == 0 {
                    continue;
                }

                let pixel = &mut self.display[py][px];
                collision |= *pixel;
                *pixel = !*pixel;
                changed = true;
            }
        }

        self.registers[cpu::register::LAST] = collision as u8;

        if changed {
            self.display_changed = true;
            Ok((ProgramCounterStep::Next, Operation::Draw))
        } else {
            Ok((ProgramCounterStep::Next, Operation::None))
        }
    }

    fn skip_key_pressed(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // EX9E
        // Skips the next instruction if the key stored in VX is pressed.
        Ok(ProgramCounterStep::cond(
            self.keyboard.is_pressed(self.registers[x] as usize),
        ))
    }

    fn skip_key_not_pressed(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // EXA1
        // Skips the next instruction if the key stored in VX isn't pressed.
        Ok(ProgramCounterStep::cond(
            !self.keyboard.is_pressed(self.registers[x] as usize),
        ))
    }

    fn get_delay_timer_into(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // FX07
        // Sets VX to the value of the delay timer.
        self.registers[x] = self.delay_timer.get_value();
        Ok(ProgramCounterStep::Next)
    }

    fn wait_key(&mut self, x: usize) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        // FX0A
        // A key press is awaited, and then stored in VX. Until then the same instruction is run
        // again, the timers keep on counting down in the meantime.
        match self.keyboard.get_keys().iter().rposition(|&pressed| pressed) {
            Some(key) => {
                debug_assert!(key < keyboard::SIZE);
                self.registers[x] = key as u8;
                Ok((ProgramCounterStep::Next, Operation::None))
            }
            None => Ok((ProgramCounterStep::Repeat, Operation::Wait)),
        }
    }

    fn set_delay_timer_from(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // FX15
        self.delay_timer.set_value(self.registers[x]);
        Ok(ProgramCounterStep::Next)
    }

    fn set_sound_timer_from(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // FX18
        self.sound_timer.set_value(self.registers[x]);
        Ok(ProgramCounterStep::Next)
    }

    fn add_to_index(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // FX1E
        // Adds VX to I. VF is not affected.
        self.index_register = self.index_register.wrapping_add(self.registers[x] as u16);
        Ok(ProgramCounterStep::Next)
    }

    fn font_char_address(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // FX29
        // Sets I to the location of the sprite for the character in VX. Characters 0-F (in
        // hexadecimal) are represented by a 4x5 font. Larger values point past the font.
        let val = self.registers[x] as usize;
        self.index_register =
            (display::fontset::LOCATION + display::fontset::GLYPH_SIZE * val) as u16;
        Ok(ProgramCounterStep::Next)
    }

    fn store_bcd(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // FX33
        // Stores the binary-coded decimal representation of VX, with the most significant
        // of three digits at the address in I, the middle digit at I plus 1, and the least
        // significant digit at I plus 2.
        let range = self.memory_range(self.index_register as usize, 3)?;
        let r = self.registers[x];

        self.memory[range].copy_from_slice(&[
            r / 100,      // 246u8 / 100 => 2
            r / 10 % 10,  // 246u8 / 10 => 24 % 10 => 4
            r % 10,       // 246u8 % 10 => 6
        ]);
        Ok(ProgramCounterStep::Next)
    }

    fn store_registers(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // FX55
        // Stores V0 to VX (including VX) in memory starting at address I. I itself is left
        // unmodified.
        let range = self.memory_range(self.index_register as usize, x + 1)?;
        self.memory[range].copy_from_slice(&self.registers[..=x]);
        Ok(ProgramCounterStep::Next)
    }

    fn load_registers(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // FX65
        // Fills V0 to VX (including VX) with values from memory starting at address I. I itself
        // is left unmodified.
        let range = self.memory_range(self.index_register as usize, x + 1)?;
        self.registers[..=x].copy_from_slice(&self.memory[range]);
        Ok(ProgramCounterStep::Next)
    }
}
