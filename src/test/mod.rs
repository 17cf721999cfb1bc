//! Byte buffer builders for effect scripts and script tables.

use crate::{
    disassembler::VarLength,
    file::io::FxIO,
    script::EFFECT_HEADER_SIZE,
};

/// Builds one effect script: the fixed header followed by raw instruction bytes.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    kind: u16,
    texture_id: u16,
    effect_lifetime: u16,
    particle_lifetime: u16,
    flags: u32,
    gravity: f32,
    friction: f32,
    vel: [f32; 3],
    unknowns: [f32; 3],
    size: f32,
    code: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: u16) -> Self {
        self.kind = kind;
        self
    }

    pub fn texture_id(mut self, texture_id: u16) -> Self {
        self.texture_id = texture_id;
        self
    }

    pub fn lifetimes(mut self, effect: u16, particle: u16) -> Self {
        self.effect_lifetime = effect;
        self.particle_lifetime = particle;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn vel(mut self, x: f32, y: f32, z: f32) -> Self {
        self.vel = [x, y, z];
        self
    }

    pub fn unknowns(mut self, unk0: f32, unk1: f32, unk2: f32) -> Self {
        self.unknowns = [unk0, unk1, unk2];
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Append raw instruction bytes
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.code.extend_from_slice(bytes);
        self
    }

    /// Append a big-endian float operand
    pub fn float(mut self, value: f32) -> Self {
        self.code.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Append a var-length step count
    pub fn steps(mut self, value: u32) -> Self {
        self.code
            .extend(VarLength::encode(value).expect("step count out of range"));
        self
    }

    /// Append the `End` instruction
    pub fn end(self) -> Self {
        self.raw(&[0xFF])
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(EFFECT_HEADER_SIZE + self.code.len());
        data.extend_from_slice(&FxIO::to_be_bytes(self.kind));
        data.extend_from_slice(&FxIO::to_be_bytes(self.texture_id));
        data.extend_from_slice(&FxIO::to_be_bytes(self.effect_lifetime));
        data.extend_from_slice(&FxIO::to_be_bytes(self.particle_lifetime));
        data.extend_from_slice(&FxIO::to_be_bytes(self.flags));
        data.extend_from_slice(&FxIO::to_be_bytes(self.gravity));
        data.extend_from_slice(&FxIO::to_be_bytes(self.friction));
        for value in self.vel.iter().chain(self.unknowns.iter()) {
            data.extend_from_slice(&FxIO::to_be_bytes(*value));
        }
        data.extend_from_slice(&FxIO::to_be_bytes(self.size));
        data.extend_from_slice(&self.code);
        data
    }
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Null,
    Script(usize),
    Pointer(u32),
}

/// Builds a script table followed by the scripts it points to.
///
/// Scripts are laid out after the pointer array in the order they were added, each followed by
/// the configured padding.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    entries: Vec<Entry>,
    scripts: Vec<Vec<u8>>,
    padding: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry pointing to a new script
    pub fn script(mut self, script: ScriptBuilder) -> Self {
        self.scripts.push(script.build());
        self.entries.push(Entry::Script(self.scripts.len() - 1));
        self
    }

    /// Add an entry pointing to the `index`-th script added so far
    pub fn alias(mut self, index: usize) -> Self {
        self.entries.push(Entry::Script(index));
        self
    }

    /// Add a zero pointer
    pub fn null(mut self) -> Self {
        self.entries.push(Entry::Null);
        self
    }

    /// Add an arbitrary pointer value
    pub fn pointer(mut self, address: u32) -> Self {
        self.entries.push(Entry::Pointer(address));
        self
    }

    /// Pad every script with `padding` zero bytes
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut offsets = Vec::with_capacity(self.scripts.len());
        let mut offset = 4 + 4 * self.entries.len();
        for script in &self.scripts {
            offsets.push(offset);
            offset += script.len() + self.padding;
        }

        let count = i32::try_from(self.entries.len()).expect("too many entries");
        let mut data = Vec::with_capacity(offset);
        data.extend_from_slice(&FxIO::to_be_bytes(count));

        for entry in &self.entries {
            let address = match *entry {
                Entry::Null => 0,
                Entry::Script(index) => u32::try_from(offsets[index]).expect("offset too large"),
                Entry::Pointer(address) => address,
            };
            data.extend_from_slice(&FxIO::to_be_bytes(address));
        }

        for script in &self.scripts {
            data.extend_from_slice(script);
            data.resize(data.len() + self.padding, 0);
        }

        data
    }
}
