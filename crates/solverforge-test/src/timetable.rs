//! School timetabling facts.

/// A lesson placed in an optional timeslot and room.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lesson {
    pub id: usize,
    pub subject: String,
    pub teacher: String,
    pub student_group: String,
    pub timeslot: Option<usize>,
    pub room: Option<usize>,
}

impl Lesson {
    pub fn new(
        id: usize,
        subject: impl Into<String>,
        teacher: impl Into<String>,
        student_group: impl Into<String>,
    ) -> Self {
        Self {
            id,
            subject: subject.into(),
            teacher: teacher.into(),
            student_group: student_group.into(),
            timeslot: None,
            room: None,
        }
    }

    pub fn placed(mut self, timeslot: usize, room: usize) -> Self {
        self.timeslot = Some(timeslot);
        self.room = Some(room);
        self
    }

    pub fn is_placed(&self) -> bool {
        self.timeslot.is_some() && self.room.is_some()
    }
}
