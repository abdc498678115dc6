use geo::Point;

pub type IonStormId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IonStormState {
    Growing,
    Fading,
}

#[derive(Debug, Clone, Copy)]
pub struct IonStorm {
    pub id: IonStormId,
    pub center: Point,
    pub radius: u16,
    pub voltage: u16,
    pub heading: f64,
    pub speed: u8,
    pub state: IonStormState,
}
