// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

pub mod body;
pub mod config;
pub mod feed;
pub mod files;
pub mod frontmatter;
pub mod handler;
pub mod layout;
pub mod locale;
pub mod metadata;
pub mod registry;
pub mod schema;
pub mod sitemap;
pub mod slug;
pub mod social;
pub mod template;
