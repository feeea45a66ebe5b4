//! Raw column name → canonical field table.

use std::collections::HashMap;

/// Every field a source column can feed. Adding a field here forces the
/// normalizer's assignment step to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    Year,
    OfficeName,
    Site,
    WeekEnding,
    WorkDate,
    DateRange,
    EmployeeId,
    LastName,
    FirstName,
    FullName,
    EmployeeTypeId,
    Shift,
    Department,
    AllocationMethod,
    TimeStart,
    TimeEnd,
    RegularHours,
    OvertimeHours,
    DoubleTimeHours,
    HolidayHours,
    TotalHours,
    ClockInLocal,
    ClockInTries,
    ClockInMethod,
    ClockOutLocal,
    ClockOutTries,
    ClockOutMethod,
    EntryType,
}

/// Versioned many-to-one alias table.
///
/// Passed explicitly to the normalizer so that several export generations
/// can be handled side by side.
#[derive(Debug, Clone)]
pub struct AliasTable {
    version: String,
    map: HashMap<String, CanonicalField>,
}

impl AliasTable {
    pub fn from_pairs<I, S>(version: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, CanonicalField)>,
        S: Into<String>,
    {
        Self {
            version: version.to_string(),
            map: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Aliases of the weekly exports in use since 2024: the CamelCase
    /// convention, the Snake_Case one, and a few spaced headers.
    pub fn builtin() -> Self {
        use CanonicalField::*;

        Self::from_pairs(
            "v1",
            [
                ("year", Year),
                ("OfcName", OfficeName),
                ("Ofc_Name", OfficeName),
                ("XLC Operation", Site),
                ("XLC_Operation", Site),
                ("dtEndCliWorkWeek", WeekEnding),
                ("Dt_End_CLI_Work_Week", WeekEnding),
                ("WorkDate", WorkDate),
                ("Work_Date", WorkDate),
                ("Date Range", DateRange),
                ("Date_Range", DateRange),
                ("ApplicantID", EmployeeId),
                ("Applicant_ID", EmployeeId),
                ("LastName", LastName),
                ("Last_Name", LastName),
                ("FirstName", FirstName),
                ("First_Name", FirstName),
                ("FullName", FullName),
                ("Full_Name", FullName),
                ("EmployeeTypeID", EmployeeTypeId),
                ("Employee_Type_ID", EmployeeTypeId),
                ("ShiftNumber", Shift),
                ("Shift_Number", Shift),
                ("BUDeptName", Department),
                ("BU_Dept_Name", Department),
                ("Allocation_Method", AllocationMethod),
                ("dtTimeStart", TimeStart),
                ("Dt_Time_Start", TimeStart),
                ("dtTimeEnd", TimeEnd),
                ("Dt_Time_End", TimeEnd),
                ("RegHours", RegularHours),
                ("Reg_Hours", RegularHours),
                ("OTHours", OvertimeHours),
                ("OT_Hours", OvertimeHours),
                ("DTHours", DoubleTimeHours),
                ("DT_Hours", DoubleTimeHours),
                ("HolWrkHours", HolidayHours),
                ("Hol_Wrk_Hours", HolidayHours),
                ("Total Hours", TotalHours),
                ("Total_Hours", TotalHours),
                // the misspelling ships in the older exports
                ("ClockIn_LOcal", ClockInLocal),
                ("Clock_In_Local", ClockInLocal),
                ("ClockIn_Tries", ClockInTries),
                ("Clock_In_Tries", ClockInTries),
                ("ClockIn_Method", ClockInMethod),
                ("Clock_In_Method", ClockInMethod),
                ("ClockOut_Local", ClockOutLocal),
                ("Clock_Out_Local", ClockOutLocal),
                ("ClockOut_Tries", ClockOutTries),
                ("Clock_Out_Tries", ClockOutTries),
                ("ClockOut_Method", ClockOutMethod),
                ("Clock_Out_Method", ClockOutMethod),
                ("EntryType", EntryType),
                ("Entry_Type", EntryType),
            ],
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn resolve(&self, raw: &str) -> Option<CanonicalField> {
        self.map.get(raw).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}
