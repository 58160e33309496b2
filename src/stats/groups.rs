//! Declarative stat-group configuration
//!
//! One table of (label, value-column candidates, rank-column candidates) per
//! view concern. Candidate lists absorb the source data's inconsistent rank
//! column suffixes; resolution happens once in the data layer.

/// A single displayed statistic.
#[derive(Debug, Clone, Copy)]
pub struct StatDef {
    pub label: &'static str,
    pub value: &'static [&'static str],
    pub rank: &'static [&'static str],
}

/// A titled section of statistics.
#[derive(Debug, Clone, Copy)]
pub struct StatGroup {
    pub title: &'static str,
    pub defs: &'static [StatDef],
}

const OFFENSE: &[StatDef] = &[
    StatDef { label: "Points Per Game", value: &["Points"], rank: &["Points_RANK", "Points_Rank"] },
    StatDef { label: "Field Goal Percentage", value: &["FG_PERC"], rank: &["FG_PERC_Rank", "FG_PERC_RANK"] },
    StatDef { label: "Field Goals Made per Game", value: &["FGM/G"], rank: &["FGM/G_Rank", "FGM/G_RANK"] },
    StatDef { label: "3 Point Field Goal Percentage", value: &["FG3_PERC"], rank: &["FG3_PERC_Rank", "FG3_PERC_RANK"] },
    StatDef { label: "3 Point Field Goals Made per Game", value: &["FG3M/G"], rank: &["FG3M/G_Rank", "FG3M/G_RANK"] },
    StatDef { label: "Free Throw Percentage", value: &["FT_PERC"], rank: &["FT_PERC_Rank", "FT_PERC_RANK"] },
    StatDef { label: "Free Throws Made per Game", value: &["FTM/G"], rank: &["FTM/G_RANK", "FTM/G_Rank"] },
    StatDef { label: "Percent of Points from 3", value: &["% of Points from 3"], rank: &["% of Points from 3_RANK", "% of Points from 3_Rank"] },
    StatDef { label: "Percent of Shots Taken from 3", value: &["% of shots taken from 3"], rank: &["% of shots taken from 3_RANK", "% of shots taken from 3_Rank"] },
];

const DEFENSE: &[StatDef] = &[
    StatDef { label: "Opponent Points Per Game", value: &["OPP_PPG"], rank: &["OPP_PPG_RANK", "OPP_PPG_Rank"] },
    StatDef { label: "Opponent Field Goal Percentage", value: &["OPP_FG_PERC"], rank: &["OPP_FG_PERC_Rank", "OPP_FG_PERC_RANK"] },
    StatDef { label: "Opponent FGM per Game", value: &["OPP_FGM/G"], rank: &["OPP_FGM/G_Rank", "OPP_FGM/G_RANK"] },
    StatDef { label: "Opponent 3PT Percentage", value: &["OPP_FG3_PERC"], rank: &["OPP_FG3_PERC_Rank", "OPP_FG3_PERC_RANK"] },
    StatDef { label: "Opponent 3PTM per Game", value: &["OPP_FG3M/G"], rank: &["OPP_FG3M/G_Rank", "OPP_FG3M/G_RANK"] },
    StatDef { label: "Opponent % of Points from 3", value: &["OPP_% of Points from 3"], rank: &["OPP_% of Points from 3_RANK", "OPP_% of Points from 3 rank"] },
    StatDef { label: "Opponent % of Shots Taken from 3", value: &["OPP_% of shots taken from 3"], rank: &["OPP_% of shots taken from 3_RANK", "OPP_% of shots taken from 3 Rank"] },
    StatDef { label: "Opponent Offensive Rebounds", value: &["OPP_OReb"], rank: &["OPP_OReb_RANK", "OPP_OReb_Rank"] },
];

const POSSESSION: &[StatDef] = &[
    StatDef { label: "Offensive Rebounds", value: &["OReb"], rank: &["OReb Rank", "OReb_RANK"] },
    StatDef { label: "Offensive Rebound Chances", value: &["OReb chances", "OReb_chances"], rank: &["OReb chances Rank", "OReb_chances Rank"] },
    StatDef { label: "Defensive Rebounds", value: &["DReb"], rank: &["DReb Rank", "DReb_RANK"] },
    StatDef { label: "Total Rebounds", value: &["Rebounds"], rank: &["Rebounds Rank", "Rebounds_RANK"] },
    StatDef { label: "Rebound Rate", value: &["Rebound Rate"], rank: &["Rebound Rate Rank", "Rebound Rate_Rank"] },
    StatDef { label: "Assists", value: &["AST"], rank: &["AST Rank", "AST_RANK"] },
    StatDef { label: "Assists per Field Goal Made", value: &["AST/FGM"], rank: &["AST/FGM Rank", "AST/FGM_Rank"] },
    StatDef { label: "Turnovers", value: &["TO"], rank: &["TO Rank", "TO_RANK"] },
    StatDef { label: "Steals", value: &["STL"], rank: &["STL Rank", "STL_RANK"] },
];

const EXTRAS: &[StatDef] = &[
    StatDef { label: "Extra Scoring Chances", value: &["Extra Scoring Chances"], rank: &["Extra Scoring Chances Rank", "Extra Scoring Chances_Rank"] },
    StatDef { label: "Points Off Turnovers", value: &["PTS_OFF_TURN"], rank: &["PTS_OFF_TURN_RANK", "PTS_OFF_TURN_Rank"] },
    StatDef { label: "Fast Break Points", value: &["FST_BREAK"], rank: &["FST_BREAK_RANK", "FST_BREAK_Rank"] },
    StatDef { label: "Points in Paint", value: &["PTS_PAINT"], rank: &["PTS_PAINT_RANK", "PTS_PAINT_Rank"] },
    StatDef { label: "Personal Fouls", value: &["PF"], rank: &["PF_Rank", "PF_RANK"] },
    StatDef { label: "Foul Differential", value: &["Foul Differential"], rank: &["Foul Differential Rank", "Foul Differential_Rank"] },
];

/// Sections of the team-breakdown view.
pub fn breakdown_groups() -> &'static [StatGroup] {
    &[
        StatGroup { title: "Offensive Statistics", defs: OFFENSE },
        StatGroup { title: "Defensive Statistics", defs: DEFENSE },
        StatGroup { title: "Rebounds / AST / TO / STL", defs: POSSESSION },
        StatGroup { title: "Extra Statistics", defs: EXTRAS },
    ]
}

/// Rank-column categories for the comparison view (lower rank = better).
/// SOS, Top7 and Clutch fields are deliberately excluded.
pub fn rank_categories() -> &'static [(&'static str, &'static [&'static str])] {
    &[
        (
            "Offense",
            &[
                "Points_RANK", "FG_PERC_Rank", "FG3_PERC_Rank", "FT_PERC_Rank",
                "FGM/G_Rank", "FG3M/G_Rank", "FTM/G_RANK",
                "Off_eff_rank", "Off_eff_hybrid_rank",
            ],
        ),
        (
            "Defense",
            &[
                "OPP_PPG_RANK", "OPP_FG_PERC_Rank", "OPP_FG3_PERC_Rank",
                "OPP_FGM/G_Rank", "OPP_FG3M/G_Rank", "Def_eff_hybrid_rank",
            ],
        ),
        (
            "Rebounding",
            &["OReb Rank", "DReb Rank", "Rebounds Rank", "Rebound Rate Rank"],
        ),
        (
            "Ball Movement",
            &["AST Rank", "AST/FGM Rank", "TO Rank", "STL Rank"],
        ),
        ("Discipline", &["PF_Rank", "Foul Differential Rank"]),
        (
            "Extra/Tempo",
            &[
                "Extra Scoring Chances Rank", "FTA/FGA Rank",
                "PTS_OFF_TURN_RANK", "FST_BREAK_RANK", "PTS_PAINT_RANK",
            ],
        ),
    ]
}

/// Columns of the clutch summary table.
pub fn clutch_columns() -> &'static [&'static str] {
    &[
        "CLUTCH_FGM", "CLUTCH_FGA", "CLUTCH_FGPERC", "CLUTCH_FG_RANK",
        "CLUTCH_3FGM", "CLUTCH_3FGA", "CLUTCH_3FGPERC", "CLUTCH_3_RANK",
        "CLUTCH_FTM", "CLUTCH_FTA", "CLUTCH_FTPERC", "CLUTCH_FT_RANK",
        "CLUTCH_SM", "CLUTCH_SM_RANK",
        "CLUTCH_REB", "CLUTCH_REB_RANK",
        "OPP_CLTCH_REB", "OPP_CLTCH_REB_RANK",
        "CLTCH_OFF_REB", "CLTCH_OFF_REB_RANK",
        "OPP_CLTCH_OFF_REB", "OPP_CLTCH_OFF_REB_RANK",
        "CLTCH_TURN", "CLTCH_TURN_RANK",
        "CLTCH_OPP_TURN", "CLTCH_OPP_TURN_RANK",
        "CLTCH_STL", "CLTCH_STL_RANK",
        "TOP25_CLUTCH", "OVERTIME_GAMES",
    ]
}

/// (label, season column, clutch column) triples for the shooting comparison.
pub fn shooting_splits() -> &'static [(&'static str, &'static str, &'static str)] {
    &[
        ("FG%", "FG_PERC", "CLUTCH_FGPERC"),
        ("3PT%", "FG3_PERC", "CLUTCH_3FGPERC"),
        ("FT%", "FT_PERC", "CLUTCH_FTPERC"),
    ]
}

/// Top-7 rotation stats: (label, value column, rank column).
pub fn top7_stats() -> &'static [(&'static str, &'static str, &'static str)] {
    &[
        ("FGM", "FGM_TOP7", "FGM_TOP7_RANK"),
        ("FGA", "FGA-Top7", "FGA-Top7_RANK"),
        ("3PM", "FG3sM-Top7", "FG3sM-Top7_RANK"),
        ("3PA", "FG3sA-Top7", "FG3sA-Top7_RANK"),
        ("FTM", "FTM-Top7", "FTM-Top7_RANK"),
        ("FTA", "FTA-Top7", "FTA-Top7_RANK"),
        ("FG%", "FG_PERC-Top7", "FG_PERC-Top7_RANK"),
        ("3P%", "FG3_PERC-Top7", "FG3_PERC-Top7_RANK"),
        ("FT%", "FT_PERC-Top7", "FT_PERC-Top7_RANK"),
        ("OReb", "OReb-Top7", "OReb-Top7_RANK"),
        ("DReb", "DReb-Top7", "DReb-Top7_RANK"),
        ("Rebounds", "Rebounds-Top7", "Rebounds-Top7_RANK"),
        ("AST", "AST-Top7", "AST-Top7_RANK"),
        ("TO", "TO-Top7", "TO-Top7_RANK"),
        ("STL", "STL-Top7", "STL-Top7_RANK"),
        ("Points", "Points per Game-Top7", "Points-Top7_RANK"),
        ("Start %", "Start Percentage top 7", "Start Percentage top 7_RANK"),
    ]
}

/// Suffix marking the top-7 percentage-share columns compared against the
/// conference mean.
pub const TOP7_SHARE_MARKER: &str = "-Perc";
