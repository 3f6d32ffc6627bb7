use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub school: String,
    pub location: String,
    pub graduation_date: String,
    pub gpa: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: String,
}

/// The resume being edited. Every field accepts any string or list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub personal: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonalField {
    Name,
    Email,
    Phone,
    Location,
    Linkedin,
    Website,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceField {
    Title,
    Company,
    Location,
    StartDate,
    EndDate,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationField {
    Degree,
    School,
    Location,
    GraduationDate,
    Gpa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectField {
    Name,
    Description,
    /// Comma-separated list; blanks are dropped.
    Technologies,
    Link,
}

/// One localized change to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeEdit {
    Personal {
        field: PersonalField,
        value: String,
    },
    Summary(String),
    Experience {
        index: usize,
        field: ExperienceField,
        value: String,
    },
    Education {
        index: usize,
        field: EducationField,
        value: String,
    },
    Project {
        index: usize,
        field: ProjectField,
        value: String,
    },
    Skills(Vec<String>),
    AddExperience,
    RemoveExperience { index: usize },
    AddEducation,
    RemoveEducation { index: usize },
    AddProject,
    RemoveProject { index: usize },
}

impl ResumeDocument {
    /// Applies one edit. Returns false when the edit addressed a missing record
    /// or did not change anything.
    pub fn apply(&mut self, edit: ResumeEdit) -> bool {
        match edit {
            ResumeEdit::Personal { field, value } => {
                let slot = match field {
                    PersonalField::Name => &mut self.personal.name,
                    PersonalField::Email => &mut self.personal.email,
                    PersonalField::Phone => &mut self.personal.phone,
                    PersonalField::Location => &mut self.personal.location,
                    PersonalField::Linkedin => &mut self.personal.linkedin,
                    PersonalField::Website => &mut self.personal.website,
                };
                replace(slot, value)
            }
            ResumeEdit::Summary(value) => replace(&mut self.summary, value),
            ResumeEdit::Experience {
                index,
                field,
                value,
            } => {
                let Some(entry) = self.experience.get_mut(index) else {
                    return false;
                };
                let slot = match field {
                    ExperienceField::Title => &mut entry.title,
                    ExperienceField::Company => &mut entry.company,
                    ExperienceField::Location => &mut entry.location,
                    ExperienceField::StartDate => &mut entry.start_date,
                    ExperienceField::EndDate => &mut entry.end_date,
                    ExperienceField::Description => &mut entry.description,
                };
                replace(slot, value)
            }
            ResumeEdit::Education {
                index,
                field,
                value,
            } => {
                let Some(entry) = self.education.get_mut(index) else {
                    return false;
                };
                let slot = match field {
                    EducationField::Degree => &mut entry.degree,
                    EducationField::School => &mut entry.school,
                    EducationField::Location => &mut entry.location,
                    EducationField::GraduationDate => &mut entry.graduation_date,
                    EducationField::Gpa => &mut entry.gpa,
                };
                replace(slot, value)
            }
            ResumeEdit::Project {
                index,
                field,
                value,
            } => {
                let Some(project) = self.projects.get_mut(index) else {
                    return false;
                };
                match field {
                    ProjectField::Name => replace(&mut project.name, value),
                    ProjectField::Description => replace(&mut project.description, value),
                    ProjectField::Link => replace(&mut project.link, value),
                    ProjectField::Technologies => {
                        let technologies = split_list(&value);
                        if project.technologies == technologies {
                            false
                        } else {
                            project.technologies = technologies;
                            true
                        }
                    }
                }
            }
            ResumeEdit::Skills(skills) => {
                if self.skills == skills {
                    false
                } else {
                    self.skills = skills;
                    true
                }
            }
            ResumeEdit::AddExperience => {
                self.experience.push(Experience::default());
                true
            }
            ResumeEdit::RemoveExperience { index } => remove_at(&mut self.experience, index),
            ResumeEdit::AddEducation => {
                self.education.push(Education::default());
                true
            }
            ResumeEdit::RemoveEducation { index } => remove_at(&mut self.education, index),
            ResumeEdit::AddProject => {
                self.projects.push(Project::default());
                true
            }
            ResumeEdit::RemoveProject { index } => remove_at(&mut self.projects, index),
        }
    }

    /// Skills as shown in the skills field.
    pub fn skills_text(&self) -> String {
        self.skills.join(", ")
    }
}

/// Appends `keyword` to free text, separated by a single space.
pub fn append_keyword(text: &mut String, keyword: &str) {
    if !text.is_empty() && !text.ends_with(char::is_whitespace) {
        text.push(' ');
    }
    text.push_str(keyword);
}

fn replace(slot: &mut String, value: String) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> bool {
    if index < items.len() {
        items.remove(index);
        true
    } else {
        false
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
