//! Quips shown next to the No button while it runs away

/// Regular escape quips
pub const ESCAPE_MESSAGES: &[&str] = &[
    "Nice try 😏",
    "Nope!",
    "Not happening 💅",
    "Think again!",
    "Uh uh!",
    "Keep dreaming 😘",
    "Wrong choice!",
    "Really? 🙄",
    "Catch me! 🏃‍♀️",
    "Too slow!",
];

/// Quips once the chase has gone on for a while
pub const DESPERATE_MESSAGES: &[&str] = &[
    "Please stop 😭",
    "Just say yes!",
    "I'm tired 😮‍💨",
    "You're persistent!",
    "Fine, I'll shrink!",
    "HELPPP! 🆘",
    "Why me?! 😫",
];

/// Owned copy of a pool (for `Tuning` defaults)
pub fn to_owned_pool(pool: &[&str]) -> Vec<String> {
    pool.iter().map(|s| s.to_string()).collect()
}
