//! Fixed value pools the generator draws from. Small on purpose: the records
//! only need to look plausible, not be unique.

pub const NAMES: &[&str] = &[
    "John Smith", "Emma Johnson", "Michael Brown", "Olivia Davis", "William Wilson",
    "Sophia Martinez", "James Taylor", "Isabella Anderson", "Robert Thomas", "Ava Garcia",
    "David Rodriguez", "Mia Lopez", "Joseph Lee", "Charlotte Lewis", "Thomas Walker",
    "Amelia Hall", "Daniel Allen", "Harper Young", "Matthew King", "Evelyn Scott",
];

pub const MESSAGE_TEMPLATES: &[&str] = &[
    "Hey, how are you doing?",
    "Can we meet up later today?",
    "Don't forget about our meeting tomorrow!",
    "Did you see the news today?",
    "Thanks for your help yesterday.",
    "Happy birthday! 🎂",
    "I'll be there in 10 minutes.",
    "Could you send me that file we discussed?",
    "Are you free this weekend?",
    "Just checking in. How's everything?",
];

/// (extension, MIME type)
pub const FILE_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("mp4", "video/mp4"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("txt", "text/plain"),
    ("mp3", "audio/mpeg"),
];

pub const DIRECTORIES: &[&str] = &["Documents", "Downloads", "Pictures", "Videos", "Music"];

/// (city, latitude, longitude)
pub const CITY_COORDINATES: &[(&str, f64, f64)] = &[
    ("New York", 40.7128, -74.0060),
    ("Los Angeles", 34.0522, -118.2437),
    ("Chicago", 41.8781, -87.6298),
    ("Houston", 29.7604, -95.3698),
    ("Phoenix", 33.4484, -112.0740),
    ("Philadelphia", 39.9526, -75.1652),
    ("San Antonio", 29.4241, -98.4936),
    ("San Diego", 32.7157, -117.1611),
    ("Dallas", 32.7767, -96.7970),
    ("San Jose", 37.3382, -121.8863),
];
