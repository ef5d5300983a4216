//! Contributors and genre lists
//!
//! Both collections keep insertion order and drop repeats, so the first
//! occurrence decides where an entry sits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a contributor plays on a work or recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Wrote the music
    Composer,
    /// Wrote the lyrics
    Lyricist,
    /// Credited as writer without a finer split
    Writer,
    /// Arranged the piece
    Arranger,
    /// Album-level performing artist
    Performer,
    /// Per-track artist
    TrackArtist,
    /// Conducted the performance
    Conductor,
    /// Orchestra, band or choir
    Ensemble,
    /// Produced the recording
    Producer,
    /// Recording engineer
    Engineer,
    /// Mixing engineer
    Mixer,
    /// Remixed or modified the recording
    Remixer,
    /// Featured soloist
    Soloist,
}

impl ActorRole {
    /// Roles credited on the composition rather than the recording
    pub fn is_composition(&self) -> bool {
        matches!(
            self,
            ActorRole::Composer | ActorRole::Lyricist | ActorRole::Writer
        )
    }

    /// Role name as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Composer => "composer",
            ActorRole::Lyricist => "lyricist",
            ActorRole::Writer => "writer",
            ActorRole::Arranger => "arranger",
            ActorRole::Performer => "performer",
            ActorRole::TrackArtist => "track_artist",
            ActorRole::Conductor => "conductor",
            ActorRole::Ensemble => "ensemble",
            ActorRole::Producer => "producer",
            ActorRole::Engineer => "engineer",
            ActorRole::Mixer => "mixer",
            ActorRole::Remixer => "remixer",
            ActorRole::Soloist => "soloist",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named contributor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Display name
    pub name: String,

    /// Credited role
    pub role: ActorRole,
}

/// Ordered contributor list, unique by (name, role)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actors(Vec<Actor>);

impl Actors {
    /// Append a contributor unless the same name already holds the role
    ///
    /// Returns `true` if the actor was inserted.
    pub fn add(&mut self, name: impl Into<String>, role: ActorRole) -> bool {
        let name = name.into();
        if name.is_empty() || self.contains(&name, role) {
            return false;
        }
        self.0.push(Actor { name, role });
        true
    }

    /// Append every actor of `other` in its order
    pub fn merge(&mut self, other: &Actors) {
        for actor in other.iter() {
            self.add(actor.name.clone(), actor.role);
        }
    }

    /// Check whether `name` already holds `role`
    pub fn contains(&self, name: &str, role: ActorRole) -> bool {
        self.0.iter().any(|a| a.role == role && a.name == name)
    }

    /// Name of the first contributor, if any
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|a| a.name.as_str())
    }

    /// Contributors holding `role`, in insertion order
    pub fn with_role(&self, role: ActorRole) -> impl Iterator<Item = &Actor> {
        self.0.iter().filter(move |a| a.role == role)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Actor> {
        self.0.iter()
    }

    /// Number of contributors
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Actors {
    type Item = &'a Actor;
    type IntoIter = std::slice::Iter<'a, Actor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Ordered genre set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genres(Vec<String>);

impl Genres {
    /// Append a genre unless already present
    pub fn add(&mut self, genre: impl Into<String>) -> bool {
        let genre = genre.into();
        if genre.is_empty() || self.0.contains(&genre) {
            return false;
        }
        self.0.push(genre);
        true
    }

    /// Append every genre of `other` not yet present
    pub fn merge(&mut self, other: &Genres) {
        for genre in other.iter() {
            self.add(genre.clone());
        }
    }

    /// First genre, if any
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Number of genres
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Genres {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
