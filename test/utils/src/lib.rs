use std::env;

use serde_json::json;
use serde_json::Value;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

/// A `/student/{id}` body the way the backend stores it after an analysis.
pub fn student_fixture() -> Value {
    return json!({
        "skills": ["Python", "SQL", "Communication"],
        "skill_gaps": ["Machine Learning", "Data Analysis"],
        "pathway": {
            "Machine Learning": {
                "title": "Intro to ML",
                "url": "https://www.coursera.org/learn/machine-learning",
                "type": "course"
            },
            "Data Analysis": {
                "title": "SQL for Data Analysis",
                "url": "https://mode.com/sql-tutorial/",
                "type": "tutorial"
            }
        },
        "career_matches": [
            {
                "title": "Data Scientist",
                "match_percentage": 50.0,
                "matching_skills": ["Python", "SQL"],
                "missing_skills": ["Machine Learning", "Data Analysis"],
                "details": {
                    "required_skills": ["Python", "Machine Learning", "Data Analysis", "SQL"],
                    "salary_range": "$80,000 - $150,000",
                    "growth_rate": "High",
                    "education": "Bachelor's or Master's in Computer Science, Statistics, or related field"
                }
            }
        ],
        "progress": {
            "Data Analysis": true,
            "Machine Learning": false
        },
        "profile": {
            "name": "J. Doe",
            "career_goal": {
                "title": "Data Scientist"
            }
        }
    });
}

/// A `/analyze_resume` body, which carries the new student id alongside the
/// record fields.
pub fn analyzed_resume_fixture(student_id: &str) -> Value {
    let mut body = student_fixture();
    let map = body.as_object_mut().unwrap();
    map.remove("progress");
    map.remove("profile");
    map.insert("student_id".to_string(), json!(student_id));

    return body;
}

pub fn market_data_fixture() -> Value {
    return json!({
        "required_skills": ["Python", "SQL"],
        "career_paths": {
            "Web Developer": {
                "required_skills": ["JavaScript", "HTML/CSS", "React", "Node.js"],
                "salary_range": "$70,000 - $120,000",
                "growth_rate": "Medium",
                "education": "Bachelor's in Computer Science or self-taught with portfolio"
            }
        }
    });
}
