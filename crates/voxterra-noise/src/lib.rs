//! Composable scalar fields over 3D space.
//!
//! A [`NoiseGraph`] is an append-only arena of nodes. Each builder method pushes
//! one node and returns its [`NodeId`]; children must already exist, so the
//! arena is always a DAG in topological order. Evaluation is a pure recursive
//! walk and never mutates the graph, so a built graph can be shared across
//! threads behind an `Arc`.
#![forbid(unsafe_code)]

mod fractal;

pub use fractal::{BasisType, Interpolation};

use fractal::{Fractal, FractalKind};

/// Handle to a node inside one [`NoiseGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Clone, Copy, Debug)]
enum UnaryOp {
    Negate,
    Abs,
}

#[derive(Clone, Copy, Debug)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug)]
enum Node {
    Constant(f64),
    Axis(Axis),
    Unary(UnaryOp, NodeId),
    Binary(BinaryOp, NodeId, NodeId),
    Clamp {
        value: NodeId,
        lo: NodeId,
        hi: NodeId,
    },
    Select {
        low: NodeId,
        high: NodeId,
        control: NodeId,
        threshold: NodeId,
        falloff: NodeId,
    },
    Fractal(Fractal),
    ScaleOffset {
        value: NodeId,
        scale: f64,
        offset: f64,
    },
    ScaleDomain {
        source: NodeId,
        axis: Axis,
        factor: NodeId,
    },
    TranslateDomain {
        source: NodeId,
        axis: Axis,
        delta: NodeId,
    },
}

#[derive(Debug, Default)]
pub struct NoiseGraph {
    nodes: Vec<Node>,
}

impl NoiseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> NodeId {
        assert!(self.nodes.len() < u32::MAX as usize, "noise graph is full");
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[track_caller]
    fn check(&self, ids: &[NodeId]) {
        for id in ids {
            assert!(
                id.index() < self.nodes.len(),
                "node {:?} does not belong to this graph ({} nodes)",
                id,
                self.nodes.len()
            );
        }
    }

    pub fn constant(&mut self, c: f64) -> NodeId {
        self.push(Node::Constant(c))
    }

    pub fn axis(&mut self, axis: Axis) -> NodeId {
        self.push(Node::Axis(axis))
    }

    pub fn x(&mut self) -> NodeId {
        self.axis(Axis::X)
    }

    pub fn y(&mut self) -> NodeId {
        self.axis(Axis::Y)
    }

    pub fn z(&mut self) -> NodeId {
        self.axis(Axis::Z)
    }

    pub fn negate(&mut self, v: NodeId) -> NodeId {
        self.check(&[v]);
        self.push(Node::Unary(UnaryOp::Negate, v))
    }

    pub fn abs(&mut self, v: NodeId) -> NodeId {
        self.check(&[v]);
        self.push(Node::Unary(UnaryOp::Abs, v))
    }

    fn binary(&mut self, op: BinaryOp, a: NodeId, b: NodeId) -> NodeId {
        self.check(&[a, b]);
        self.push(Node::Binary(op, a, b))
    }

    pub fn add(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.binary(BinaryOp::Add, a, b)
    }

    pub fn subtract(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.binary(BinaryOp::Subtract, a, b)
    }

    pub fn multiply(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.binary(BinaryOp::Multiply, a, b)
    }

    /// `a / b`, with a zero divisor evaluating to `0.0`.
    pub fn divide(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.binary(BinaryOp::Divide, a, b)
    }

    pub fn clamp(&mut self, value: NodeId, lo: NodeId, hi: NodeId) -> NodeId {
        self.check(&[value, lo, hi]);
        self.push(Node::Clamp { value, lo, hi })
    }

    /// Picks `high` where `control >= threshold` and `low` elsewhere.
    ///
    /// A positive `falloff` replaces the step with a quintic blend across
    /// `[threshold - falloff, threshold + falloff]`.
    pub fn select(
        &mut self,
        low: NodeId,
        high: NodeId,
        control: NodeId,
        threshold: NodeId,
        falloff: NodeId,
    ) -> NodeId {
        self.check(&[low, high, control, threshold, falloff]);
        self.push(Node::Select {
            low,
            high,
            control,
            threshold,
            falloff,
        })
    }

    pub fn fractal_brownian_motion(
        &mut self,
        basis: BasisType,
        interp: Interpolation,
        octaves: u32,
        frequency: f64,
        seed: u32,
    ) -> NodeId {
        self.push(Node::Fractal(Fractal::new(
            FractalKind::Fbm,
            basis,
            interp,
            octaves,
            frequency,
            seed,
        )))
    }

    pub fn ridged_multifractal(
        &mut self,
        basis: BasisType,
        interp: Interpolation,
        octaves: u32,
        frequency: f64,
        seed: u32,
    ) -> NodeId {
        self.push(Node::Fractal(Fractal::new(
            FractalKind::Ridged,
            basis,
            interp,
            octaves,
            frequency,
            seed,
        )))
    }

    pub fn scale_offset(&mut self, value: NodeId, scale: f64, offset: f64) -> NodeId {
        self.check(&[value]);
        self.push(Node::ScaleOffset {
            value,
            scale,
            offset,
        })
    }

    /// Evaluates `source` with the `axis` coordinate multiplied by `factor`.
    pub fn scale_domain(&mut self, source: NodeId, axis: Axis, factor: NodeId) -> NodeId {
        self.check(&[source, factor]);
        self.push(Node::ScaleDomain {
            source,
            axis,
            factor,
        })
    }

    /// Evaluates `source` with the `axis` coordinate shifted by `delta`.
    pub fn translate_domain(&mut self, source: NodeId, axis: Axis, delta: NodeId) -> NodeId {
        self.check(&[source, delta]);
        self.push(Node::TranslateDomain {
            source,
            axis,
            delta,
        })
    }

    /// `scale_z(v, 0)` flattens a 3D field into a heightmap over x/y.
    pub fn scale_z(&mut self, source: NodeId, factor: f64) -> NodeId {
        let factor = self.constant(factor);
        self.scale_domain(source, Axis::Z, factor)
    }

    pub fn translate_z(&mut self, source: NodeId, delta: NodeId) -> NodeId {
        self.translate_domain(source, Axis::Z, delta)
    }

    /// Value of `node` at `(x, y, z)`. Total over finite inputs.
    ///
    /// Panics if `node` came from another graph with fewer nodes.
    pub fn evaluate(&self, node: NodeId, x: f64, y: f64, z: f64) -> f64 {
        match &self.nodes[node.index()] {
            Node::Constant(c) => *c,
            Node::Axis(axis) => match axis {
                Axis::X => x,
                Axis::Y => y,
                Axis::Z => z,
            },
            Node::Unary(op, v) => {
                let v = self.evaluate(*v, x, y, z);
                match op {
                    UnaryOp::Negate => -v,
                    UnaryOp::Abs => v.abs(),
                }
            }
            Node::Binary(op, a, b) => {
                let a = self.evaluate(*a, x, y, z);
                let b = self.evaluate(*b, x, y, z);
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Subtract => a - b,
                    BinaryOp::Multiply => a * b,
                    BinaryOp::Divide => {
                        if b == 0.0 {
                            0.0
                        } else {
                            a / b
                        }
                    }
                }
            }
            Node::Clamp { value, lo, hi } => {
                let v = self.evaluate(*value, x, y, z);
                let lo = self.evaluate(*lo, x, y, z);
                let hi = self.evaluate(*hi, x, y, z);
                // min(max(v, lo), hi); f64::clamp panics on lo > hi
                v.max(lo).min(hi)
            }
            Node::Select {
                low,
                high,
                control,
                threshold,
                falloff,
            } => {
                let c = self.evaluate(*control, x, y, z);
                let t = self.evaluate(*threshold, x, y, z);
                let f = self.evaluate(*falloff, x, y, z);
                if f > 0.0 {
                    if c <= t - f {
                        self.evaluate(*low, x, y, z)
                    } else if c >= t + f {
                        self.evaluate(*high, x, y, z)
                    } else {
                        let w = quintic((c - (t - f)) / (2.0 * f));
                        let lo = self.evaluate(*low, x, y, z);
                        let hi = self.evaluate(*high, x, y, z);
                        lo + (hi - lo) * w
                    }
                } else if c >= t {
                    self.evaluate(*high, x, y, z)
                } else {
                    self.evaluate(*low, x, y, z)
                }
            }
            Node::Fractal(fractal) => fractal.sample(x, y, z),
            Node::ScaleOffset {
                value,
                scale,
                offset,
            } => self.evaluate(*value, x, y, z) * scale + offset,
            Node::ScaleDomain {
                source,
                axis,
                factor,
            } => {
                let s = self.evaluate(*factor, x, y, z);
                let (x, y, z) = remap(*axis, x, y, z, |c| c * s);
                self.evaluate(*source, x, y, z)
            }
            Node::TranslateDomain {
                source,
                axis,
                delta,
            } => {
                let d = self.evaluate(*delta, x, y, z);
                let (x, y, z) = remap(*axis, x, y, z, |c| c + d);
                self.evaluate(*source, x, y, z)
            }
        }
    }
}

#[inline]
fn remap(axis: Axis, x: f64, y: f64, z: f64, f: impl FnOnce(f64) -> f64) -> (f64, f64, f64) {
    match axis {
        Axis::X => (f(x), y, z),
        Axis::Y => (x, f(y), z),
        Axis::Z => (x, y, f(z)),
    }
}

#[inline]
fn quintic(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_by_zero_is_zero() {
        let mut g = NoiseGraph::new();
        let a = g.constant(3.0);
        let z = g.constant(0.0);
        let d = g.divide(a, z);
        assert_eq!(g.evaluate(d, 1.0, 2.0, 3.0), 0.0);
        let two = g.constant(2.0);
        let d2 = g.divide(a, two);
        assert_eq!(g.evaluate(d2, 0.0, 0.0, 0.0), 1.5);
    }

    #[test]
    fn hard_select_steps_at_threshold() {
        let mut g = NoiseGraph::new();
        let lo = g.constant(-1.0);
        let hi = g.constant(1.0);
        let ctl = g.x();
        let t = g.constant(0.5);
        let f = g.constant(0.0);
        let s = g.select(lo, hi, ctl, t, f);
        assert_eq!(g.evaluate(s, 0.49, 0.0, 0.0), -1.0);
        assert_eq!(g.evaluate(s, 0.5, 0.0, 0.0), 1.0);
        assert_eq!(g.evaluate(s, 0.9, 0.0, 0.0), 1.0);
    }

    #[test]
    fn soft_select_blends_monotonically() {
        let mut g = NoiseGraph::new();
        let lo = g.constant(0.0);
        let hi = g.constant(1.0);
        let ctl = g.x();
        let t = g.constant(0.0);
        let f = g.constant(1.0);
        let s = g.select(lo, hi, ctl, t, f);
        assert_eq!(g.evaluate(s, -1.0, 0.0, 0.0), 0.0);
        assert_eq!(g.evaluate(s, 1.0, 0.0, 0.0), 1.0);
        assert!((g.evaluate(s, 0.0, 0.0, 0.0) - 0.5).abs() < 1e-12);
        let mut prev = 0.0;
        for i in -10..=10 {
            let v = g.evaluate(s, f64::from(i) / 10.0, 0.0, 0.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn clamp_and_arithmetic() {
        let mut g = NoiseGraph::new();
        let z = g.z();
        let lo = g.constant(0.0);
        let hi = g.constant(4.0);
        let c = g.clamp(z, lo, hi);
        assert_eq!(g.evaluate(c, 0.0, 0.0, -3.0), 0.0);
        assert_eq!(g.evaluate(c, 0.0, 0.0, 2.5), 2.5);
        assert_eq!(g.evaluate(c, 0.0, 0.0, 9.0), 4.0);

        let x = g.x();
        let y = g.y();
        let sum = g.add(x, y);
        let diff = g.subtract(x, y);
        let prod = g.multiply(sum, diff);
        let neg = g.negate(prod);
        let abs = g.abs(neg);
        assert_eq!(g.evaluate(prod, 3.0, 2.0, 0.0), 5.0);
        assert_eq!(g.evaluate(neg, 3.0, 2.0, 0.0), -5.0);
        assert_eq!(g.evaluate(abs, 3.0, 2.0, 0.0), 5.0);
    }

    #[test]
    fn scale_z_zero_flattens() {
        let mut g = NoiseGraph::new();
        let n = g.fractal_brownian_motion(BasisType::Simplex, Interpolation::Quintic, 3, 0.1, 5);
        let flat = g.scale_z(n, 0.0);
        let base = g.evaluate(flat, 3.0, 7.0, 0.0);
        for z in [-40.0, -1.0, 0.5, 12.0, 300.0] {
            assert_eq!(g.evaluate(flat, 3.0, 7.0, z).to_bits(), base.to_bits());
        }
        assert_eq!(base.to_bits(), g.evaluate(n, 3.0, 7.0, 0.0).to_bits());
    }

    #[test]
    fn translate_z_shifts_input() {
        let mut g = NoiseGraph::new();
        let z = g.z();
        let d = g.constant(2.5);
        let t = g.translate_z(z, d);
        assert_eq!(g.evaluate(t, 0.0, 0.0, 1.0), 3.5);

        let x = g.x();
        let sx = g.constant(3.0);
        let s = g.scale_domain(x, Axis::X, sx);
        assert_eq!(g.evaluate(s, 2.0, 0.0, 0.0), 6.0);
        let ty = g.translate_domain(x, Axis::Y, sx);
        assert_eq!(g.evaluate(ty, 2.0, 0.0, 0.0), 2.0);
    }

    #[test]
    fn scale_offset_applies_affine() {
        let mut g = NoiseGraph::new();
        let x = g.x();
        let so = g.scale_offset(x, 32.0, -4.0);
        assert_eq!(g.evaluate(so, 0.5, 0.0, 0.0), 12.0);
    }

    #[test]
    #[should_panic(expected = "does not belong")]
    fn foreign_node_is_rejected() {
        let mut big = NoiseGraph::new();
        for _ in 0..4 {
            big.constant(1.0);
        }
        let foreign = big.constant(2.0);
        let mut small = NoiseGraph::new();
        small.negate(foreign);
    }
}
