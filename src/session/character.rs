use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterId {
    Waving,
    Cheering,
    Reading,
    Thinking,
    Sleepy,
}

pub const ALL_CHARACTERS: [CharacterId; 5] = [
    CharacterId::Waving,
    CharacterId::Cheering,
    CharacterId::Reading,
    CharacterId::Thinking,
    CharacterId::Sleepy,
];

impl CharacterId {
    pub fn asset_id(self) -> &'static str {
        match self {
            CharacterId::Waving => "owl-1",
            CharacterId::Cheering => "owl-2",
            CharacterId::Reading => "owl-3",
            CharacterId::Thinking => "owl-4",
            CharacterId::Sleepy => "owl-5",
        }
    }

    /// Uniform pick over the whole pool.
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ALL_CHARACTERS[rng.gen_range(0..ALL_CHARACTERS.len())]
    }
}
