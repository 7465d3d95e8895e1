use {
    crate::definitions::keyboard,
    hashbrown::HashMap,
    once_cell::sync::Lazy,
    parking_lot::RwLock,
    std::sync::Arc,
};

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will display all from the pixels, a slice of rows.
    fn display(&mut self, pixels: &[Vec<bool>]);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data, the keyboard is
/// also the device that controls if the machine runs at all.
pub trait KeyboardCommands {
    /// The current state of all the keys.
    fn get_keyboard(&self) -> [bool; keyboard::SIZE];
    /// The run state requested by the user.
    fn get_run_state(&self) -> RunState;
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the sound output
pub trait SoundCommands {
    /// Turns the tone on or off.
    fn set_tone(&mut self, on: bool);
}

/// If the driver shall run the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Quit,
}

impl Default for RunState {
    fn default() -> Self {
        RunState::Running
    }
}

/// Will represent the last set key with the previous
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    index: usize,
    last: bool,
    current: bool,
}

impl Key {
    fn new(index: usize, last: bool, current: bool) -> Self {
        Self {
            index,
            last,
            current,
        }
    }

    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn get_last(&self) -> bool {
        self.last
    }

    pub fn get_current(&self) -> bool {
        self.current
    }
}

/// Maps the host keys onto the keypad.
static HOST_KEY_MAP: Lazy<HashMap<char, usize>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(keyboard::SIZE);

    for (host_row, row) in keyboard::HOST_LAYOUT.iter().zip(keyboard::LAYOUT.iter()) {
        for (&host, &key) in host_row.iter().zip(row.iter()) {
            map.insert(host, key);
        }
    }

    map
});

/// Will store the last change to the given keyboard
/// and represent the internal keyboard as well
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
#[derive(Default, Debug, Clone)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
    last: Option<Key>,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    /// Translates a host key into the index of the keypad key at the same
    /// place, the lookup ignores the case.
    ///
    /// # Example
    /// ```rust
    /// # use vm::devices::Keyboard;
    /// assert_eq!(Keyboard::map_key('x'), Some(0x0));
    /// assert_eq!(Keyboard::map_key('4'), Some(0xC));
    /// assert_eq!(Keyboard::map_key('V'), Some(0xF));
    /// assert_eq!(Keyboard::map_key('p'), None);
    /// ```
    pub fn map_key(host: char) -> Option<usize> {
        HOST_KEY_MAP.get(&host.to_ascii_lowercase()).copied()
    }

    /// Will toggle the given key, keys outside of the keypad are ignored.
    pub fn toggle_key(&mut self, key: usize) {
        if let Some(&current) = self.keys.get(key) {
            self.set_key(key, !current)
        }
    }

    /// Will set the given key, keys outside of the keypad are ignored.
    pub fn set_key(&mut self, key: usize, to: bool) {
        if key >= keyboard::SIZE {
            log::warn!("Ignoring the key {:#X} outside of the keypad.", key);
            return;
        }

        self.last = Some(Key::new(key, self.keys[key], to));
        self.keys[key] = to;
    }

    pub fn set_mult(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keys = *keys;
        self.last = None;
    }

    pub fn get_keys(&self) -> &[bool; keyboard::SIZE] {
        &self.keys
    }

    /// Checks if the key is pressed, keys outside of the keypad never are.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    pub fn get_last(&self) -> Option<Key> {
        self.last
    }
}

#[derive(Debug, Default)]
struct SharedState {
    keyboard: Keyboard,
    run_state: RunState,
}

/// A keyboard that can be written to by the input thread, while the machine
/// reads from it.
#[derive(Debug, Clone, Default)]
pub struct SharedKeyboard {
    state: Arc<RwLock<SharedState>>,
}

impl SharedKeyboard {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_key(&self, key: usize, to: bool) {
        self.state.write().keyboard.set_key(key, to);
    }

    /// Presses or releases the keypad key sitting at the host key, returns
    /// false if the host key has no keypad key.
    pub fn set_host_key(&self, host: char, to: bool) -> bool {
        match Keyboard::map_key(host) {
            Some(key) => {
                self.set_key(key, to);
                true
            }
            None => false,
        }
    }

    pub fn set_run_state(&self, run_state: RunState) {
        log::info!("Run state changed to {:?}", run_state);
        self.state.write().run_state = run_state;
    }

    /// Switches between running and paused, a quit machine stays quit.
    pub fn toggle_pause(&self) {
        let next = match self.get_run_state() {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Quit => RunState::Quit,
        };
        self.set_run_state(next);
    }
}

impl KeyboardCommands for SharedKeyboard {
    fn get_keyboard(&self) -> [bool; keyboard::SIZE] {
        *self.state.read().keyboard.get_keys()
    }

    fn get_run_state(&self) -> RunState {
        self.state.read().run_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_layout_covers_keypad() {
        let mut found = [false; keyboard::SIZE];
        for row in keyboard::HOST_LAYOUT.iter() {
            for &host in row.iter() {
                let key = Keyboard::map_key(host).expect("every host key is mapped");
                found[key] = true;
            }
        }
        assert_eq!(found, [true; keyboard::SIZE]);
    }

    #[test]
    fn test_set_key_tracks_last() {
        let mut keyboard = Keyboard::new();
        assert!(keyboard.get_last().is_none());

        keyboard.toggle_key(0x4);
        let last = keyboard.get_last().expect("a key was set");
        assert_eq!(last.get_index(), 0x4);
        assert!(!last.get_last());
        assert!(last.get_current());
        assert!(keyboard.is_pressed(0x4));

        keyboard.set_key(0x4, false);
        assert!(!keyboard.is_pressed(0x4));
        assert!(keyboard.get_last().unwrap().get_last());
    }

    #[test]
    fn test_out_of_range_keys() {
        let mut keyboard = Keyboard::new();
        keyboard.set_key(keyboard::SIZE, true);
        keyboard.toggle_key(0xFF);
        assert!(keyboard.get_last().is_none());
        assert!(!keyboard.is_pressed(keyboard::SIZE));
        assert!(!keyboard.is_pressed(0xFF));
    }

    #[test]
    fn test_shared_keyboard() {
        let shared = SharedKeyboard::new();
        let reader = shared.clone();

        assert_eq!(reader.get_run_state(), RunState::Running);
        assert!(shared.set_host_key('w', true));
        assert!(!shared.set_host_key('p', true));

        let mut expected = [false; keyboard::SIZE];
        expected[0x5] = true;
        assert_eq!(reader.get_keyboard(), expected);

        shared.toggle_pause();
        assert_eq!(reader.get_run_state(), RunState::Paused);
        shared.toggle_pause();
        assert_eq!(reader.get_run_state(), RunState::Running);
        shared.set_run_state(RunState::Quit);
        shared.toggle_pause();
        assert_eq!(reader.get_run_state(), RunState::Quit);
    }
}
