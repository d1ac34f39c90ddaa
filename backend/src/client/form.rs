//! Interactive terminal form for the eleven patient fields.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::models::{Gender, RawPatientInput};

/// Prompts for each patient attribute, re-asking until the answer parses and
/// lies within the form's range.
///
/// The form ranges are input widgets only; the server applies its own bounds.
pub struct PatientForm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PatientForm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Walk through every field and return the payload to post.
    pub fn collect(&mut self) -> io::Result<RawPatientInput> {
        let age = self.ask_number("Enter Age", 1, 100)?;
        let gender = self.ask_gender()?;
        let height = self.ask_number("Enter height in cm", 50.0, 200.0)?;
        let weight = self.ask_number("Enter weight in kg", 10.0, 200.0)?;
        let ap_hi = self.ask_number("Enter Systolic blood pressure", 50, 250)?;
        let ap_lo = self.ask_number("Enter Diastolic blood pressure", 0, 150)?;
        let cholesterol = self.ask_number("Enter Cholesterol level", 100, 260)?;
        let gluc = self.ask_number("Enter Glucose level", 50, 150)?;
        let smoke = self.ask_yes_no("Do you smoke?")?;
        let alco = self.ask_yes_no("Do you consume alcohol?")?;
        let active = self.ask_yes_no("Are you physically active?")?;

        Ok(RawPatientInput {
            age,
            gender,
            height,
            weight,
            ap_hi,
            ap_lo,
            cholesterol,
            gluc,
            smoke,
            alco,
            active,
        })
    }

    fn read_answer(&mut self) -> io::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the form was complete",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn ask_number<T>(&mut self, label: &str, min: T, max: T) -> io::Result<T>
    where
        T: FromStr + PartialOrd + Display + Copy,
    {
        loop {
            write!(self.output, "{} [{}-{}]: ", label, min, max)?;
            let answer = self.read_answer()?;
            match answer.parse::<T>() {
                Ok(value) if value >= min && value <= max => return Ok(value),
                Ok(_) => writeln!(self.output, "  Value must be between {} and {}", min, max)?,
                Err(_) => writeln!(self.output, "  '{}' is not a valid number", answer)?,
            }
        }
    }

    fn ask_choice(&mut self, label: &str, options: &[&str]) -> io::Result<usize> {
        loop {
            write!(self.output, "{} ({}): ", label, options.join("/"))?;
            let answer = self.read_answer()?.to_lowercase();
            if let Some(idx) = options.iter().position(|o| *o == answer) {
                return Ok(idx);
            }
            writeln!(self.output, "  Please answer one of: {}", options.join(", "))?;
        }
    }

    fn ask_gender(&mut self) -> io::Result<Gender> {
        loop {
            write!(self.output, "Select your gender (male/female): ")?;
            match self.read_answer()?.parse::<Gender>() {
                Ok(gender) => return Ok(gender),
                Err(message) => writeln!(self.output, "  {}", message)?,
            }
        }
    }

    fn ask_yes_no(&mut self, label: &str) -> io::Result<bool> {
        Ok(self.ask_choice(label, &["yes", "no"])? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(answers: &str) -> (io::Result<RawPatientInput>, String) {
        let mut output = Vec::new();
        let result = PatientForm::new(Cursor::new(answers.to_string()), &mut output).collect();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_collects_all_fields() {
        let (result, _) = run("50\nmale\n170\n80\n140\n90\n250\n110\nno\nno\nyes\n");
        let raw = result.unwrap();
        assert_eq!(raw.age, 50);
        assert_eq!(raw.gender, Gender::Male);
        assert_eq!(raw.height, 170.0);
        assert_eq!(raw.gluc, 110);
        assert!(!raw.smoke);
        assert!(raw.active);
    }

    #[test]
    fn test_reprompts_on_bad_answers() {
        let (result, transcript) =
            run("abc\n0\n45\nother\nFemale\n160\n60\n120\n80\n180\n90\nmaybe\nyes\nno\nno\n");
        let raw = result.unwrap();
        assert_eq!(raw.age, 45);
        assert_eq!(raw.gender, Gender::Female);
        assert!(raw.smoke);
        assert!(transcript.contains("'abc' is not a valid number"));
        assert!(transcript.contains("Value must be between 1 and 100"));
        assert!(transcript.contains("Unknown gender 'other'"));
        assert!(transcript.contains("Please answer one of: yes, no"));
    }

    #[test]
    fn test_eof_aborts() {
        let (result, _) = run("50\nmale\n");
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }
}
