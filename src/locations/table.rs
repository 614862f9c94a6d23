use super::Location;

const fn loc(
    name: &'static str,
    tradition: &'static str,
    place: &'static str,
    lat: f64,
    lon: f64,
    note: &'static str,
    special_icon: bool,
) -> Location {
    Location {
        name,
        tradition,
        place,
        lat,
        lon,
        note,
        special_icon,
    }
}

const ROVANIEMI: Location = loc(
    "Santa Claus (Rovaniemi)",
    "Official Santa",
    "Rovaniemi, Finland",
    66.5039,
    25.7294,
    "Santa Claus Village vibes",
    true,
);
const NORTH_POLE: Location = loc(
    "Santa Claus (North Pole)",
    "Official Santa",
    "North Pole, Alaska, USA",
    64.7511,
    -147.3494,
    "Santa Claus House",
    true,
);
const PERE_NOEL: Location = loc(
    "Père Noël",
    "Western Europe",
    "Strasbourg, France",
    48.5734,
    7.7521,
    "Markets + magic",
    false,
);
const DED_MOROZ: Location = loc(
    "Ded Moroz (Father Frost)",
    "Slavic",
    "Veliky Ustyug, Russia",
    60.7619,
    46.3056,
    "Father Frost",
    false,
);
const PAPAI_NOEL: Location = loc(
    "Papai Noel",
    "Americas",
    "Rio de Janeiro, Brazil",
    -22.9068,
    -43.1729,
    "Tropical Santa = short sleeves",
    false,
);
const HOTEIOSHO: Location = loc(
    "Hoteiosho",
    "East Asia",
    "Tokyo, Japan",
    35.6762,
    139.6503,
    "One eye open until you're good",
    false,
);
const SURFING_SANTA: Location = loc(
    "Surfing Santa",
    "Southern Hemisphere (Summer)",
    "Sydney, Australia",
    -33.8688,
    151.2093,
    "Beach mode Santa",
    true,
);

/// The seven-stop map.
pub const CLASSIC_LOCATIONS: &[Location] = &[
    ROVANIEMI,
    NORTH_POLE,
    PERE_NOEL,
    DED_MOROZ,
    PAPAI_NOEL,
    HOTEIOSHO,
    SURFING_SANTA,
];

/// The fifteen-stop map.
pub const EXTENDED_LOCATIONS: &[Location] = &[
    ROVANIEMI,
    NORTH_POLE,
    PERE_NOEL,
    DED_MOROZ,
    PAPAI_NOEL,
    HOTEIOSHO,
    SURFING_SANTA,
    loc(
        "Sinterklaas",
        "Low Countries",
        "Amsterdam, Netherlands",
        52.3676,
        4.9041,
        "Arrives by steamboat",
        false,
    ),
    loc(
        "Christkind",
        "Central Europe",
        "Nuremberg, Germany",
        49.4521,
        11.0767,
        "Angelic gift-bringer",
        false,
    ),
    loc(
        "Father Christmas",
        "Western Europe",
        "London, United Kingdom",
        51.5072,
        -0.1276,
        "Mince pies by the chimney",
        false,
    ),
    loc(
        "Babbo Natale",
        "Southern Europe",
        "Milan, Italy",
        45.4642,
        9.19,
        "Panettone fuel",
        false,
    ),
    loc(
        "La Befana",
        "Southern Europe",
        "Rome, Italy",
        41.9028,
        12.4964,
        "Broomstick on Epiphany eve",
        false,
    ),
    loc(
        "Julenissen",
        "Nordic",
        "Oslo, Norway",
        59.9139,
        10.7522,
        "Porridge with butter, please",
        false,
    ),
    loc(
        "Yule Lads",
        "Nordic",
        "Reykjavik, Iceland",
        64.1466,
        -21.9426,
        "Thirteen mischievous visitors",
        false,
    ),
    loc(
        "Papá Noel",
        "Americas",
        "Buenos Aires, Argentina",
        -34.6037,
        -58.3816,
        "Midsummer sleigh",
        false,
    ),
];
