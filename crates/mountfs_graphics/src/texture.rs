use std::ops::Deref;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(usize);
impl Deref for Id {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct Cache<T> {
    textures: Vec<T>,
}

impl<T> Cache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { textures: vec![] }
    }

    pub fn insert(&mut self, texture: T) -> Id {
        self.textures.push(texture);
        Id(self.textures.len() - 1)
    }

    #[must_use]
    pub fn get(&self, id: Id) -> Option<&T> {
        self.textures.get(*id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// RGBA8 pixels to upload as a texture
pub struct Descriptor<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}
