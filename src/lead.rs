use std::fmt;

pub type LeadId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadStatus {
    New,
    InProgress,
    Archived,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 3] = [
        LeadStatus::New,
        LeadStatus::InProgress,
        LeadStatus::Archived,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::InProgress => "In progress",
            LeadStatus::Archived => "Archived",
        }
    }

    /// Parses the english label or the portuguese one used by exported record files.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" | "novo" => Some(LeadStatus::New),
            "in progress" | "in-progress" | "em andamento" => Some(LeadStatus::InProgress),
            "archived" | "arquivado" => Some(LeadStatus::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub origin: String,
    pub owner: String,
    pub last_activity: String,
}

impl Lead {
    /// Two letter avatar shown next to the name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

#[allow(clippy::too_many_arguments)]
fn lead(
    id: LeadId,
    name: &str,
    email: &str,
    phone: &str,
    status: LeadStatus,
    origin: &str,
    owner: &str,
    last_activity: &str,
) -> Lead {
    Lead {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        status,
        origin: origin.to_string(),
        owner: owner.to_string(),
        last_activity: last_activity.to_string(),
    }
}

/// The five mock leads the dashboard runs on when no record file is given.
pub fn seed_leads() -> Vec<Lead> {
    vec![
        lead(
            1,
            "Anael Jonas",
            "anaeljonas@outlook.com",
            "(88) 99814-7102",
            LeadStatus::New,
            "Capturador 123",
            "Lu Vieira",
            "1h ago",
        ),
        lead(
            2,
            "Bruna Carvalho",
            "bruna@empresa.com",
            "(11) 93311-0000",
            LeadStatus::InProgress,
            "Landing Page",
            "Diego",
            "3d ago",
        ),
        lead(
            3,
            "Carlos Lima",
            "carlos.lima@dominio.com",
            "(21) 98877-3322",
            LeadStatus::Archived,
            "Capturador 123",
            "Melissa",
            "12d ago",
        ),
        lead(
            4,
            "Daniela Souza",
            "danis@dominio.com",
            "(31) 98444-1122",
            LeadStatus::InProgress,
            "Indicação",
            "Lu Vieira",
            "2d ago",
        ),
        lead(
            5,
            "Eduardo Nunes",
            "edu@exemplo.com",
            "(19) 99777-5544",
            LeadStatus::New,
            "Capturador 123",
            "Diego",
            "6h ago",
        ),
    ]
}

/// Distinct values in order of first appearance.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

pub fn distinct_owners(leads: &[Lead]) -> Vec<String> {
    distinct(leads.iter().map(|l| l.owner.as_str()))
}

pub fn distinct_origins(leads: &[Lead]) -> Vec<String> {
    distinct(leads.iter().map(|l| l.origin.as_str()))
}

/// Record count per tab over the full record set: `None` is the "All" tab.
pub fn tab_counts(leads: &[Lead]) -> Vec<(Option<LeadStatus>, usize)> {
    let mut counts = vec![(None, leads.len())];
    counts.extend(
        LeadStatus::ALL
            .iter()
            .map(|&s| (Some(s), leads.iter().filter(|l| l.status == s).count())),
    );
    counts
}
