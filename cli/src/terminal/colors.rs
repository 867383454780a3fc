// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use colored::Color;

// General Purpose
pub const TEXT_DEFAULT: Color = Color::TrueColor {
    r: 212,
    g: 212,
    b: 212,
};

pub const SEPARATOR: Color = Color::BrightBlack;

pub const PRIMARY: Color = Color::TrueColor {
    r: 255,
    g: 204,
    b: 102,
};

pub const ACCENT: Color = Color::TrueColor {
    r: 170,
    g: 170,
    b: 0,
};

// Identities
pub const HOSTNAME: Color = Color::TrueColor {
    r: 102,
    g: 255,
    b: 204,
};

pub const ROOT_DOMAIN: Color = Color::TrueColor {
    r: 153,
    g: 230,
    b: 204,
};

pub const IPV4_ADDR: Color = Color::TrueColor {
    r: 170,
    g: 255,
    b: 170,
};

pub const IPV6_ADDR: Color = Color::TrueColor {
    r: 255,
    g: 102,
    b: 178,
};

// Findings
pub const TCP_PORT: Color = Color::TrueColor {
    r: 102,
    g: 204,
    b: 255,
};

pub const UDP_PORT: Color = Color::TrueColor {
    r: 178,
    g: 153,
    b: 255,
};

pub const FLAG: Color = Color::TrueColor {
    r: 255,
    g: 165,
    b: 0,
}; // Soft Orange

pub const USER_FLAG: Color = Color::TrueColor {
    r: 255,
    g: 128,
    b: 128,
};

// Verdicts
pub const IN_SCOPE: Color = Color::Green;
pub const OUT_OF_SCOPE: Color = Color::Red;
