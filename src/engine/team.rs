use std::fmt;

/// Fixed identity of one of the two teams of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamId {
    /// First-listed team; starts the match and wins ties.
    Team1,
    /// Second-listed team.
    Team2,
}

impl TeamId {
    /// The opposing team.
    pub fn other(self) -> Self {
        match self {
            TeamId::Team1 => TeamId::Team2,
            TeamId::Team2 => TeamId::Team1,
        }
    }

    /// Stable key used in logs and payloads.
    pub fn key(self) -> &'static str {
        match self {
            TeamId::Team1 => "team1",
            TeamId::Team2 => "team2",
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Roster and running score of a team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    /// Display name.
    pub name: String,
    /// Member names in the order they were entered.
    pub members: Vec<String>,
    /// Questions answered correctly so far.
    pub score: u32,
}

impl Team {
    /// Build a team with a zero score, trimming the name and every member and
    /// dropping blank member entries.
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        let name = name.into().trim().to_owned();
        let members = members
            .into_iter()
            .map(|member| member.trim().to_owned())
            .filter(|member| !member.is_empty())
            .collect();

        Self {
            name,
            members,
            score: 0,
        }
    }

    /// A team can play once it has a name and at least one member.
    pub fn is_configured(&self) -> bool {
        !self.name.is_empty() && !self.members.is_empty()
    }
}

/// Split a comma-separated member list as typed in a setup form.
pub fn parse_members(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|member| !member.is_empty())
        .map(str::to_owned)
        .collect()
}

/// The two teams of a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Teams {
    team1: Team,
    team2: Team,
}

impl Teams {
    /// Borrow a team by identity.
    pub fn get(&self, id: TeamId) -> &Team {
        match id {
            TeamId::Team1 => &self.team1,
            TeamId::Team2 => &self.team2,
        }
    }

    pub(crate) fn get_mut(&mut self, id: TeamId) -> &mut Team {
        match id {
            TeamId::Team1 => &mut self.team1,
            TeamId::Team2 => &mut self.team2,
        }
    }

    /// Both teams in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &Team)> {
        [(TeamId::Team1, &self.team1), (TeamId::Team2, &self.team2)].into_iter()
    }

    /// Whether both teams have a name and at least one member.
    pub fn all_configured(&self) -> bool {
        self.team1.is_configured() && self.team2.is_configured()
    }
}
