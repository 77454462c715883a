//! Domain enumeration tables of the mainframe interface.

use crate::status::ghs_enum;

ghs_enum! {
    /// Access permission the mainframe grants this client.
    pub enum Access: "GHSAccess" {
        ReadOnly = 0 => "ReadOnly",
        ReadWrite = 1 => "ReadWrite",
    }
}

ghs_enum! {
    pub enum AcquisitionState: "GHSAcquisitionState" {
        Reserved = 0 => "Reserved",
        Recording = 1 => "Recording",
        Pause = 2 => "Pause",
        SavingData = 3 => "SavingData",
        Idle = 4 => "Idle",
        Preview = 5 => "Preview",
    }
}

ghs_enum! {
    pub enum SyncStatus: "GHSSyncStatus" {
        Reserved = 0 => "Reserved",
        NotSynced = 1 => "NotSynced",
        Syncing = 2 => "Syncing",
        Synced = 3 => "Synced",
        ReSyncing = 4 => "ReSyncing",
        NoSignal = 5 => "NoSignal",
        CoarseSynced = 6 => "CoarseSynced",
        NoGmr1000 = 7 => "NoGMR1000",
        NoOtmc100 = 8 => "NoOTMC100",
    }
}

ghs_enum! {
    pub enum UserMode: "GHSUserMode" {
        Reserved = 0 => "Reserved",
        Sweeps = 1 => "Sweeps",
        Continuous = 2 => "Continuous",
        Dual = 3 => "Dual",
    }
}

ghs_enum! {
    pub enum StorageLocation: "GHSStorageLocation" {
        Reserved = 0 => "Reserved",
        Remote = 1 => "Remote",
        Local1 = 2 => "Local1",
        Local2 = 3 => "Local2",
        Iscsi1 = 4 => "iSCSI1",
        Iscsi2 = 5 => "iSCSI2",
    }
}

ghs_enum! {
    pub enum SweepRecordingMode: "GHSSweepRecordingMode" {
        Reserved = 0 => "Reserved",
        Normal = 1 => "Normal",
        PreTrigger = 2 => "PreTrigger",
    }
}

ghs_enum! {
    pub enum ContinuousRecordingMode: "GHSContinuousRecordingMode" {
        Reserved = 0 => "Reserved",
        Standard = 1 => "Standard",
        Circular = 2 => "Circular",
        Limited = 3 => "Limited",
        StopOnTrigger = 4 => "StopOnTrigger",
    }
}

ghs_enum! {
    pub enum ChannelType: "GHSChannelType" {
        Invalid = 0 => "Invalid",
        Analog = 1 => "Analog",
        Event = 2 => "Event",
        TimerCounter = 3 => "TimerCounter",
    }
}

ghs_enum! {
    pub enum AmplifierMode: "GHSAmplifierMode" {
        None = -1 => "None",
        Basic = 0 => "Basic",
        Bridge = 1 => "Bridge",
        Icp = 2 => "Icp",
        ThermoCouple = 3 => "ThermoCouple",
        BasicSensor = 4 => "BasicSensor",
        Charge = 5 => "Charge",
        Current4To20 = 6 => "Current4_20",
        ThermoResistor = 7 => "ThermoResistor",
    }
}

ghs_enum! {
    pub enum ExcitationType: "GHSExcitationType" {
        Voltage = 0 => "Voltage",
        VoltageSense = 1 => "Voltage_Sense",
        Current = 2 => "Current",
        VoltageStrobed = 3 => "Voltage_Strobed",
        VoltageSenseStrobed = 4 => "Voltage_Sense_Strobed",
        CurrentStrobed = 5 => "Current_Strobed",
    }
}

ghs_enum! {
    pub enum FilterType: "GHSFilterType" {
        Bessel = 0 => "Bessel",
        Butterworth = 1 => "Butterworth",
        Elliptic = 2 => "Elliptic",
        Fir = 3 => "FIR",
        Iir = 4 => "IIR",
        Wideband = 5 => "Wideband",
        BesselAa = 6 => "Bessel_AA",
        ButterworthAa = 7 => "Butterworth_AA",
        SigmaDeltaWb = 8 => "SigmaDeltaWB",
        SigmaDelta = 9 => "SigmaDelta",
        BandPass = 10 => "BandPass",
        Fir3Db = 11 => "FIR3dB",
    }
}

ghs_enum! {
    pub enum InputCoupling: "GHSInputCoupling" {
        SingleEndedPositive = 0 => "SingleEndedPositive",
        SingleEndedNegative = 1 => "SingleEndedNegative",
        Differential = 2 => "Differential",
        Current = 3 => "Current",
        FloatingDifferential = 4 => "FloatingDifferential",
    }
}

ghs_enum! {
    pub enum SignalCoupling: "GHSSignalCoupling" {
        Gnd = 0 => "GND",
        Dc = 1 => "DC",
        Ac = 2 => "AC",
        DcRms = 3 => "DC_RMS",
        AcRms = 4 => "AC_RMS",
        DcFrequency = 5 => "DC_Frequency",
        AcFrequency = 6 => "AC_Frequency",
        DcTrueRms = 7 => "DC_TrueRMS",
        AcTrueRms = 8 => "AC_TrueRMS",
        DcExternalProbe = 9 => "DC_ExternalProbe",
        AcExternalProbe = 10 => "AC_ExternalProbe",
        Reference = 11 => "Reference",
        ZeroSet = 12 => "ZeroSet",
        SinglePrecision = 13 => "SinglePrecision",
        DoublePrecision = 14 => "DoublePrecision",
        QuadPrecision = 15 => "QuadPrecision",
        Charge = 16 => "Charge",
    }
}

ghs_enum! {
    pub enum TriggerMode: "GHSTriggerMode" {
        Off = 0 => "Off",
        Basic = 1 => "Basic",
        Dual = 2 => "Dual",
        Window = 3 => "Window",
        DualWindow = 4 => "DualWindow",
        Sequential = 5 => "Sequential",
        QualifierBasic = 6 => "QualifierBasic",
        QualifierDual = 7 => "QualifierDual",
    }
}

ghs_enum! {
    pub enum Direction: "GHSDirection" {
        RisingEdge = 0 => "RisingEdge",
        FallingEdge = 1 => "FallingEdge",
    }
}

ghs_enum! {
    pub enum TimerCounterMode: "GHSTimerCounterMode" {
        RpmUniDirectional = 0 => "RPMUniDirectional",
        RpmBiDirectional = 1 => "RPMBiDirectional",
        RpmQuadrature = 2 => "RPMQuadrature",
        FrequencyUniDirectional = 3 => "FrequencyUniDirectional",
        FrequencyBiDirectional = 4 => "FrequencyBiDirectional",
        FrequencyQuadrature = 5 => "FrequencyQuadrature",
        CountUniDirectional = 6 => "CountUniDirectional",
        CountBiDirectional = 7 => "CountBiDirectional",
        CountQuadrature = 8 => "CountQuadrature",
        AngleQuadrature = 9 => "AngleQuadrature",
        AngleQuadratureWithRefPos = 10 => "AngleQuadratureWithRefPos",
        AngleUniDirectional = 11 => "AngleUniDirectional",
        AngleUniDirectionalWithRefPos = 12 => "AngleUniDirectionalWithRefPos",
        AngleBiDirectional = 13 => "AngleBiDirectional",
        AngleBiDirectionalWithRefPos = 14 => "AngleBiDirectionalWithRefPos",
    }
}

ghs_enum! {
    pub enum EnableDisable: "GHSEnableDisable" {
        Disable = 0 => "Disable",
        Enable = 1 => "Enable",
    }
}

ghs_enum! {
    pub enum RecordingDataSource: "GHSRecordingDataSource" {
        SyncChannels = 0 => "SyncChannels",
        SyncRealTimeFormulas = 1 => "SyncRealTimeFormulas",
    }
}

ghs_enum! {
    pub enum DigitalOutput: "GHSDigitalOutput" {
        Output1 = 0 => "Output1",
        Output2 = 1 => "Output2",
    }
}

ghs_enum! {
    pub enum DigitalOutMode: "GHSDigitalOutMode" {
        Low = 0 => "Low",
        High = 1 => "High",
        Acquiring = 2 => "Acquiring",
        Trigger = 3 => "Trigger",
        Alarm = 4 => "Alarm",
    }
}

impl From<bool> for EnableDisable {
    fn from(enabled: bool) -> Self {
        if enabled {
            EnableDisable::Enable
        } else {
            EnableDisable::Disable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{to_symbol, EnumTable};

    #[test]
    fn test_negative_code() {
        assert_eq!(AmplifierMode::None.code(), -1);
        assert_eq!(AmplifierMode::from_code(-1), Some(AmplifierMode::None));
        assert_eq!(AmplifierMode::from_code(0), Some(AmplifierMode::Basic));
    }

    #[test]
    fn test_symbol_spelling() {
        assert_eq!(StorageLocation::Iscsi1.name(), "iSCSI1");
        assert_eq!(SignalCoupling::DcTrueRms.to_string(), "DC_TrueRMS");
        assert_eq!(
            "Current4_20".parse::<AmplifierMode>(),
            Ok(AmplifierMode::Current4To20)
        );
        assert_eq!(to_symbol::<SyncStatus>(7), Some("NoGMR1000"));
    }

    #[test]
    fn test_table_metadata() {
        assert_eq!(<AcquisitionState as EnumTable>::NAME, "GHSAcquisitionState");
        assert_eq!(TimerCounterMode::ENTRIES.len(), 15);
        assert_eq!(FilterType::ENTRIES.last(), Some(&("FIR3dB", 11)));
    }

    #[test]
    fn test_enable_from_bool() {
        assert_eq!(EnableDisable::from(true), EnableDisable::Enable);
        assert_eq!(EnableDisable::from(false).code(), 0);
    }

    #[test]
    fn test_deserialize_in_struct() {
        #[derive(serde::Deserialize)]
        struct Reply {
            #[serde(rename = "GHSAcquisitionState")]
            state: AcquisitionState,
        }

        let reply: Reply = serde_json::from_str(r#"{"GHSAcquisitionState":5}"#).unwrap();
        assert_eq!(reply.state, AcquisitionState::Preview);
    }
}
