//! The micro-program tables.
//!
//! One execution sequence per opcode, plus the three pseudo slots for
//! RESET/NMI/IRQ processing. Sequences differ between the NMOS part and
//! the WDC 65C02, so the whole table is rebuilt when the flavour changes;
//! it is also built once per bus tap so that watchpoint instrumentation
//! never costs the untraced fast path anything.
//!
//! The layout below intentionally reads like a data sheet: one block per
//! opcode, one line per cycle.

use super::structs::{CpuFlavor, B_MASK, C_MASK, D_MASK, I_MASK, N_MASK, V_MASK, Z_MASK};
use super::units::{BusTap, ExecutionSequence, MicroOp, Step, MAX_STEPS};
use MicroOp::*;

fn s1(a: MicroOp) -> Step {
    Step::one(a)
}

fn s2(a: MicroOp, b: MicroOp) -> Step {
    Step::two(a, b)
}

fn s3(a: MicroOp, b: MicroOp, c: MicroOp) -> Step {
    Step::three(a, b, c)
}

struct TableBuilder {
    seqs: Vec<ExecutionSequence>,
    cmos: bool,
    tap: BusTap,
}

pub fn build_instructions(flavor: CpuFlavor, tap: BusTap) -> Vec<ExecutionSequence> {
    let mut b = TableBuilder {
        seqs: (0..super::structs::NUM_SEQUENCES)
            .map(|_| ExecutionSequence::new())
            .collect(),
        cmos: flavor == CpuFlavor::Wdc65C02,
        tap,
    };
    b.group_00();
    b.group_10();
    b.group_20();
    b.group_30();
    b.group_40();
    b.group_50();
    b.group_60();
    b.group_70();
    b.group_80();
    b.group_90();
    b.group_a0();
    b.group_b0();
    b.group_c0();
    b.group_d0();
    b.group_e0();
    b.group_f0();
    b.group_extra();
    for (i, seq) in b.seqs.iter().enumerate() {
        debug_assert!(
            seq.cycles() > 0 && seq.cycles() <= MAX_STEPS,
            "sequence {:03x} has {} steps",
            i,
            seq.cycles()
        );
    }
    b.seqs
}

impl TableBuilder {
    fn add(&mut self, op: usize, step: Step) {
        self.seqs[op].add_step(step);
    }

    /// The full set of steps for one opcode, terminated by the caller with
    /// a Decode step.
    fn seq(&mut self, op: usize, steps: &[Step]) {
        for &step in steps {
            self.add(op, step);
        }
        self.add(op, s1(Decode));
    }

    /// The 1-cycle NOP the 65C02 runs on its unused columns.
    fn nop1(&mut self, op: usize) {
        self.seq(op, &[]);
    }

    fn group_00(&mut self) {
        let t = self.tap;
        // 0x00: BRK, 7 cycles
        self.add(0x00, s2(LoadPc(1), PushExtend)); // PC+2->op, op.hi->stack
        self.add(0x00, s1(Push)); // op.lo->stack
        self.add(0x00, s2(OrToStatus(B_MASK), Push)); // P|B->op, op->stack
        if self.cmos {
            // the 65C02 clears the D bit on the way in
            self.add(0x00, s2(AndToStatus(!D_MASK), LoadVectorExtend(0xfffe)));
            self.add(0x00, s1(LoadVector(0xfffe, I_MASK)));
            self.add(0x00, s1(Jmp(0)));
        } else {
            self.add(0x00, s1(LoadVectorExtend(0xfffe)));
            // a concurrent NMI hijacks the vector fetch on the NMOS part
            self.add(0x00, s1(LoadVectorQuirk(0xfffe, 0xfffa, I_MASK)));
            self.add(0x00, s2(NmiReset, Jmp(0)));
        }
        self.add(0x00, s1(Decode));
        // 0x01: ORA (zpage,X), 6 cycles
        self.seq(
            0x01,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageWordIndirection(t)),
                s1(Indirection(t)),
                s1(Ora),
            ],
        );
        // 0x02: NOP #imm on CMOS, a true halt on NMOS
        if self.cmos {
            self.seq(0x02, &[s1(Immediate)]);
        } else {
            self.seq(0x02, &[s1(Jam(0x02))]);
        }
        if self.cmos {
            self.nop1(0x03);
        } else {
            // 0x03: SLO (zpage,X), 8 cycles
            self.seq(
                0x03,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Asl),
                    s1(IndirectWriter(t)),
                    s1(Ora),
                ],
            );
        }
        if self.cmos {
            // 0x04: TSB zpage, 5 cycles
            self.seq(
                0x04,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Tsb),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x04: NOP zpage, 3 cycles
            self.seq(0x04, &[s1(Immediate), s1(ZPageIndirection(t))]);
        }
        // 0x05: ORA zpage, 3 cycles
        self.seq(0x05, &[s1(Immediate), s2(ZPageIndirection(t), Ora)]);
        // 0x06: ASL zpage, 5 cycles
        self.seq(
            0x06,
            &[
                s1(Immediate),
                s1(ZPageIndirection(t)),
                s1(Asl),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x07: RMB0 zpage, 5 cycles
            self.seq(
                0x07,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Rmb(0x01)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x07: SLO zpage, 5 cycles
            self.seq(
                0x07,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Asl),
                    s2(ZPageIndirectWriter(t), Ora),
                ],
            );
        }
        // 0x08: PHP, 3 cycles
        self.seq(0x08, &[s1(OrToStatus(B_MASK)), s1(Push)]);
        // 0x09: ORA #imm, 2 cycles
        self.seq(0x09, &[s2(Immediate, Ora)]);
        // 0x0a: ASL A, 2 cycles
        self.seq(0x0a, &[s3(Accu, Asl, Lda)]);
        if self.cmos {
            self.nop1(0x0b);
        } else {
            // 0x0b: ANC #imm, 3 cycles; the tail is really half a ROL with
            // the result thrown away
            self.seq(0x0b, &[s2(Immediate, And), s1(CopyNToC)]);
        }
        if self.cmos {
            // 0x0c: TSB absolute, 6 cycles
            self.seq(
                0x0c,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                    s1(Tsb),
                    s1(IndirectWriter(t)),
                ],
            );
        } else {
            // 0x0c: NOP absolute, 4 cycles
            self.seq(
                0x0c,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                ],
            );
        }
        // 0x0d: ORA absolute, 4 cycles
        self.seq(
            0x0d,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), Ora),
            ],
        );
        // 0x0e: ASL absolute, 6 cycles
        self.add(0x0e, s1(Immediate));
        self.add(0x0e, s1(ImmediateWordExtension));
        self.add(0x0e, s1(Indirection(t)));
        if self.cmos {
            self.add(0x0e, s1(Asl));
        } else {
            self.add(0x0e, s2(IndirectWriter(t), Asl));
        }
        self.add(0x0e, s1(IndirectWriter(t)));
        self.add(0x0e, s1(Decode));
        if self.cmos {
            // 0x0f: BBR0 zpage,disp, 5 cycles
            self.seq(
                0x0f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x01, 0x00)),
                ],
            );
        } else {
            // 0x0f: SLO absolute, 6 cycles
            self.seq(
                0x0f,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Asl),
                    s2(IndirectWriter(t), Ora),
                ],
            );
        }
    }

    fn group_10(&mut self) {
        let t = self.tap;
        // 0x10: BPL, 2 cycles (+1 taken, +1 page cross)
        self.seq(0x10, &[s1(BranchDetect(N_MASK, 0))]);
        // 0x11: ORA (zpage),Y, 5* cycles
        self.seq(
            0x11,
            &[
                s1(Immediate),
                s2(ZPageWordIndirection(t), AddY),
                s1(Indirection(t)),
                s1(Ora),
            ],
        );
        if self.cmos {
            // 0x12: ORA (zpage), 5 cycles
            self.seq(
                0x12,
                &[
                    s1(Immediate),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s1(Ora),
                ],
            );
        } else {
            self.seq(0x12, &[s1(Jam(0x12))]);
        }
        if self.cmos {
            self.nop1(0x13);
        } else {
            // 0x13: SLO (zpage),Y, 8 cycles
            self.seq(
                0x13,
                &[
                    s1(Immediate),
                    s2(ZPageWordIndirection(t), AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Asl),
                    s2(IndirectWriter(t), Ora),
                ],
            );
        }
        if self.cmos {
            // 0x14: TRB zpage, 5 cycles
            self.seq(
                0x14,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Trb),
                    s1(IndirectWriter(t)),
                ],
            );
        } else {
            // 0x14: NOP zpage,X, 4 cycles
            self.seq(0x14, &[s1(Immediate), s1(AddXZero), s1(ZPageIndirection(t))]);
        }
        // 0x15: ORA zpage,X, 4 cycles
        self.seq(
            0x15,
            &[s1(Immediate), s1(AddXZero), s2(ZPageIndirection(t), Ora)],
        );
        // 0x16: ASL zpage,X, 6 cycles
        self.seq(
            0x16,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageIndirection(t)),
                s1(Asl),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x17: RMB1 zpage, 5 cycles
            self.seq(
                0x17,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Rmb(0x02)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x17: SLO zpage,X, 6 cycles
            self.seq(
                0x17,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageIndirection(t)),
                    s1(Asl),
                    s2(ZPageIndirectWriter(t), Ora),
                ],
            );
        }
        // 0x18: CLC, 2 cycles
        self.seq(0x18, &[s1(AndToStatus(!C_MASK))]);
        // 0x19: ORA absolute,Y, 4* cycles
        self.seq(
            0x19,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddY),
                s2(Indirection(t), Ora),
            ],
        );
        if self.cmos {
            // 0x1a: INA, 2 cycles
            self.seq(0x1a, &[s3(Accu, Inc, Lda)]);
        } else {
            // 0x1a: NOP, 2 cycles
            self.seq(0x1a, &[s1(Wait)]);
        }
        if self.cmos {
            self.nop1(0x1b);
        } else {
            // 0x1b: SLO absolute,Y, 7 cycles
            self.seq(
                0x1b,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Asl),
                    s2(IndirectWriter(t), Ora),
                ],
            );
        }
        if self.cmos {
            // 0x1c: TRB absolute, 6 cycles
            self.seq(
                0x1c,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                    s1(Trb),
                    s1(IndirectWriter(t)),
                ],
            );
        } else {
            // 0x1c: NOP absolute,X, 4* cycles
            self.seq(
                0x1c,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddX),
                    s1(Indirection(t)),
                ],
            );
        }
        // 0x1d: ORA absolute,X, 4* cycles
        self.seq(
            0x1d,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddX),
                s2(Indirection(t), Ora),
            ],
        );
        // 0x1e: ASL absolute,X, 7 cycles (6* on the 65C02)
        self.add(0x1e, s1(Immediate));
        if self.cmos {
            self.add(0x1e, s2(ImmediateWordExtension, AddX));
        } else {
            self.add(0x1e, s2(ImmediateWordExtension, AddXWait));
        }
        self.add(0x1e, s1(Indirection(t)));
        if self.cmos {
            self.add(0x1e, s1(Asl));
        } else {
            self.add(0x1e, s2(IndirectWriter(t), Asl));
        }
        self.add(0x1e, s1(IndirectWriter(t)));
        self.add(0x1e, s1(Decode));
        if self.cmos {
            // 0x1f: BBR1 zpage,disp, 5 cycles
            self.seq(
                0x1f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x02, 0x00)),
                ],
            );
        } else {
            // 0x1f: SLO absolute,X, 7 cycles
            self.seq(
                0x1f,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddXWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Asl),
                    s2(IndirectWriter(t), Ora),
                ],
            );
        }
    }

    fn group_20(&mut self) {
        let t = self.tap;
        // 0x20: JSR absolute, 6 cycles
        self.seq(
            0x20,
            &[
                s2(LoadPc(1), PushExtend),
                s1(Push),
                s1(Immediate),
                s1(ImmediateWordExtension),
                s1(Jmp(0)),
            ],
        );
        // 0x21: AND (zpage,X), 6 cycles
        self.seq(
            0x21,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageWordIndirection(t)),
                s1(Indirection(t)),
                s1(And),
            ],
        );
        // 0x22: the escape opcode. Fetches the escape identifier, runs the
        // host routine and performs an RTS, which makes a patched-in
        // [0x22, code] behave like the JSR it replaced.
        self.seq(
            0x22,
            &[
                s1(Immediate),
                s1(Esc),
                s1(Pull),
                s1(PullExtend),
                s1(Jmp(1)),
            ],
        );
        if self.cmos {
            self.nop1(0x23);
        } else {
            // 0x23: RLA (zpage,X), 8 cycles
            self.seq(
                0x23,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Rol),
                    s1(IndirectWriter(t)),
                    s1(And),
                ],
            );
        }
        // 0x24: BIT zpage, 3 cycles
        self.seq(0x24, &[s1(Immediate), s2(ZPageIndirection(t), Bit)]);
        // 0x25: AND zpage, 3 cycles
        self.seq(0x25, &[s1(Immediate), s2(ZPageIndirection(t), And)]);
        // 0x26: ROL zpage, 5 cycles
        self.seq(
            0x26,
            &[
                s1(Immediate),
                s1(ZPageIndirection(t)),
                s1(Rol),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x27: RMB2 zpage, 5 cycles
            self.seq(
                0x27,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Rmb(0x04)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x27: RLA zpage, 5 cycles
            self.seq(
                0x27,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Rol),
                    s2(ZPageIndirectWriter(t), And),
                ],
            );
        }
        // 0x28: PLP, 4 cycles
        self.seq(0x28, &[s1(Pull), s1(SetStatus), s1(Wait)]);
        // 0x29: AND #imm, 2 cycles
        self.seq(0x29, &[s2(Immediate, And)]);
        // 0x2a: ROL A, 2 cycles
        self.seq(0x2a, &[s3(Accu, Rol, Lda)]);
        if self.cmos {
            self.nop1(0x2b);
        } else {
            // 0x2b: the same P input produces differing results on real
            // silicon, so this surfaces to the monitor instead
            self.seq(0x2b, &[s1(Unstable(0x2b))]);
        }
        // 0x2c: BIT absolute, 4 cycles
        self.seq(
            0x2c,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), Bit),
            ],
        );
        // 0x2d: AND absolute, 4 cycles
        self.seq(
            0x2d,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), And),
            ],
        );
        // 0x2e: ROL absolute, 6 cycles
        self.add(0x2e, s1(Immediate));
        self.add(0x2e, s1(ImmediateWordExtension));
        self.add(0x2e, s1(Indirection(t)));
        if self.cmos {
            self.add(0x2e, s1(Rol));
        } else {
            self.add(0x2e, s2(IndirectWriter(t), Rol));
        }
        self.add(0x2e, s1(IndirectWriter(t)));
        self.add(0x2e, s1(Decode));
        if self.cmos {
            // 0x2f: BBR2 zpage,disp, 5 cycles
            self.seq(
                0x2f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x04, 0x00)),
                ],
            );
        } else {
            // 0x2f: RLA absolute, 6 cycles
            self.seq(
                0x2f,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Rol),
                    s2(IndirectWriter(t), And),
                ],
            );
        }
    }

    fn group_30(&mut self) {
        let t = self.tap;
        // 0x30: BMI
        self.seq(0x30, &[s1(BranchDetect(N_MASK, N_MASK))]);
        // 0x31: AND (zpage),Y, 5* cycles
        self.seq(
            0x31,
            &[
                s1(Immediate),
                s2(ZPageWordIndirection(t), AddY),
                s1(Indirection(t)),
                s1(And),
            ],
        );
        if self.cmos {
            // 0x32: AND (zpage)
            self.seq(
                0x32,
                &[
                    s1(Immediate),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s1(And),
                ],
            );
        } else {
            self.seq(0x32, &[s1(Jam(0x32))]);
        }
        if self.cmos {
            self.nop1(0x33);
        } else {
            // 0x33: RLA (zpage),Y, 8 cycles
            self.seq(
                0x33,
                &[
                    s1(Immediate),
                    s2(ZPageWordIndirection(t), AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Rol),
                    s2(IndirectWriter(t), And),
                ],
            );
        }
        if self.cmos {
            // 0x34: BIT zpage,X, 4 cycles
            self.seq(
                0x34,
                &[s2(Immediate, AddXZero), s1(ZPageIndirection(t)), s1(Bit)],
            );
        } else {
            // 0x34: NOP zpage,X, 4 cycles
            self.seq(0x34, &[s1(Immediate), s1(AddXZero), s1(ZPageIndirection(t))]);
        }
        // 0x35: AND zpage,X, 4 cycles
        self.seq(
            0x35,
            &[s1(Immediate), s1(AddXZero), s2(ZPageIndirection(t), And)],
        );
        // 0x36: ROL zpage,X, 6 cycles
        self.seq(
            0x36,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageIndirection(t)),
                s1(Rol),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x37: RMB3 zpage, 5 cycles
            self.seq(
                0x37,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Rmb(0x08)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x37: RLA zpage,X, 6 cycles
            self.seq(
                0x37,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageIndirection(t)),
                    s1(Rol),
                    s2(ZPageIndirectWriter(t), And),
                ],
            );
        }
        // 0x38: SEC, 2 cycles
        self.seq(0x38, &[s1(OrToStatus(C_MASK))]);
        // 0x39: AND absolute,Y, 4* cycles
        self.seq(
            0x39,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddY),
                s2(Indirection(t), And),
            ],
        );
        if self.cmos {
            // 0x3a: DEA, 2 cycles
            self.seq(0x3a, &[s3(Accu, Dec, Lda)]);
        } else {
            // 0x3a: NOP, 2 cycles
            self.seq(0x3a, &[s1(Wait)]);
        }
        if self.cmos {
            self.nop1(0x3b);
        } else {
            // 0x3b: RLA absolute,Y, 7 cycles
            self.seq(
                0x3b,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Rol),
                    s2(IndirectWriter(t), And),
                ],
            );
        }
        if self.cmos {
            // 0x3c: BIT absolute,X, 4* cycles
            self.seq(
                0x3c,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddX),
                    s2(Indirection(t), Bit),
                ],
            );
        } else {
            // 0x3c: NOP absolute,X, 4* cycles
            self.seq(
                0x3c,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddX),
                    s1(Indirection(t)),
                ],
            );
        }
        // 0x3d: AND absolute,X, 4* cycles
        self.seq(
            0x3d,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddX),
                s2(Indirection(t), And),
            ],
        );
        // 0x3e: ROL absolute,X, 7 cycles
        self.add(0x3e, s1(Immediate));
        if self.cmos {
            self.add(0x3e, s2(ImmediateWordExtension, AddX));
        } else {
            self.add(0x3e, s2(ImmediateWordExtension, AddXWait));
        }
        self.add(0x3e, s1(Indirection(t)));
        if self.cmos {
            self.add(0x3e, s1(Rol));
        } else {
            self.add(0x3e, s2(IndirectWriter(t), Rol));
        }
        self.add(0x3e, s1(IndirectWriter(t)));
        self.add(0x3e, s1(Decode));
        if self.cmos {
            // 0x3f: BBR3 zpage,disp, 5 cycles
            self.seq(
                0x3f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x08, 0x00)),
                ],
            );
        } else {
            // 0x3f: RLA absolute,X, 7 cycles
            self.seq(
                0x3f,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddXWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Rol),
                    s2(IndirectWriter(t), And),
                ],
            );
        }
    }

    fn group_40(&mut self) {
        let t = self.tap;
        // 0x40: RTI, 6 cycles
        self.seq(
            0x40,
            &[
                s1(Pull),
                s1(SetStatus),
                s1(Pull),
                s1(PullExtend),
                s1(Jmp(0)),
            ],
        );
        // 0x41: EOR (zpage,X), 6 cycles
        self.seq(
            0x41,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageWordIndirection(t)),
                s1(Indirection(t)),
                s1(Eor),
            ],
        );
        if self.cmos {
            self.seq(0x42, &[s1(Immediate)]);
        } else {
            self.seq(0x42, &[s1(Jam(0x42))]);
        }
        if self.cmos {
            self.nop1(0x43);
        } else {
            // 0x43: SRE (zpage,X), 8 cycles
            self.seq(
                0x43,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Lsr),
                    s1(IndirectWriter(t)),
                    s1(Eor),
                ],
            );
        }
        // 0x44: NOP zpage, 3 cycles
        self.seq(0x44, &[s1(Immediate), s1(ZPageIndirection(t))]);
        // 0x45: EOR zpage, 3 cycles
        self.seq(0x45, &[s1(Immediate), s2(ZPageIndirection(t), Eor)]);
        // 0x46: LSR zpage, 5 cycles
        self.seq(
            0x46,
            &[
                s1(Immediate),
                s1(ZPageIndirection(t)),
                s1(Lsr),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x47: RMB4 zpage, 5 cycles
            self.seq(
                0x47,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Rmb(0x10)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x47: SRE zpage, 5 cycles
            self.seq(
                0x47,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Lsr),
                    s2(ZPageIndirectWriter(t), Eor),
                ],
            );
        }
        // 0x48: PHA, 3 cycles
        self.seq(0x48, &[s1(Accu), s1(Push)]);
        // 0x49: EOR #imm, 2 cycles
        self.seq(0x49, &[s2(Immediate, Eor)]);
        // 0x4a: LSR A, 2 cycles
        self.seq(0x4a, &[s3(Accu, Lsr, Lda)]);
        if self.cmos {
            self.nop1(0x4b);
        } else {
            // 0x4b: ALR #imm, 3 cycles
            self.seq(0x4b, &[s2(Immediate, And), s2(Lsr, Lda)]);
        }
        // 0x4c: JMP absolute, 3 cycles
        self.seq(0x4c, &[s1(Immediate), s2(ImmediateWordExtension, Jmp(0))]);
        // 0x4d: EOR absolute, 4 cycles
        self.seq(
            0x4d,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), Eor),
            ],
        );
        // 0x4e: LSR absolute, 6 cycles
        self.add(0x4e, s1(Immediate));
        self.add(0x4e, s1(ImmediateWordExtension));
        self.add(0x4e, s1(Indirection(t)));
        if self.cmos {
            self.add(0x4e, s1(Lsr));
        } else {
            self.add(0x4e, s2(IndirectWriter(t), Lsr));
        }
        self.add(0x4e, s1(IndirectWriter(t)));
        self.add(0x4e, s1(Decode));
        if self.cmos {
            // 0x4f: BBR4 zpage,disp, 5 cycles
            self.seq(
                0x4f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x10, 0x00)),
                ],
            );
        } else {
            // 0x4f: SRE absolute, 6 cycles
            self.seq(
                0x4f,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Lsr),
                    s2(IndirectWriter(t), Eor),
                ],
            );
        }
    }

    fn group_50(&mut self) {
        let t = self.tap;
        // 0x50: BVC
        self.seq(0x50, &[s1(BranchDetect(V_MASK, 0))]);
        // 0x51: EOR (zpage),Y, 5* cycles
        self.seq(
            0x51,
            &[
                s1(Immediate),
                s2(ZPageWordIndirection(t), AddY),
                s1(Indirection(t)),
                s1(Eor),
            ],
        );
        if self.cmos {
            // 0x52: EOR (zpage)
            self.seq(
                0x52,
                &[
                    s1(Immediate),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s1(Eor),
                ],
            );
        } else {
            self.seq(0x52, &[s1(Jam(0x52))]);
        }
        if self.cmos {
            self.nop1(0x53);
        } else {
            // 0x53: SRE (zpage),Y, 8 cycles
            self.seq(
                0x53,
                &[
                    s1(Immediate),
                    s2(ZPageWordIndirection(t), AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Lsr),
                    s2(IndirectWriter(t), Eor),
                ],
            );
        }
        // 0x54: NOP zpage,X, 4 cycles
        self.seq(0x54, &[s1(Immediate), s1(AddXZero), s1(ZPageIndirection(t))]);
        // 0x55: EOR zpage,X, 4 cycles
        self.seq(
            0x55,
            &[s1(Immediate), s1(AddXZero), s2(ZPageIndirection(t), Eor)],
        );
        // 0x56: LSR zpage,X, 6 cycles
        self.seq(
            0x56,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageIndirection(t)),
                s1(Lsr),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x57: RMB5 zpage, 5 cycles
            self.seq(
                0x57,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Rmb(0x20)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x57: SRE zpage,X, 6 cycles
            self.seq(
                0x57,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageIndirection(t)),
                    s1(Lsr),
                    s2(ZPageIndirectWriter(t), Eor),
                ],
            );
        }
        // 0x58: CLI, 2 cycles
        self.seq(0x58, &[s1(AndToStatus(!I_MASK))]);
        // 0x59: EOR absolute,Y, 4* cycles
        self.seq(
            0x59,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddY),
                s2(Indirection(t), Eor),
            ],
        );
        if self.cmos {
            // 0x5a: PHY, 3 cycles
            self.seq(0x5a, &[s1(YReg), s1(Push)]);
        } else {
            // 0x5a: NOP, 2 cycles
            self.seq(0x5a, &[s1(Wait)]);
        }
        if self.cmos {
            self.nop1(0x5b);
        } else {
            // 0x5b: SRE absolute,Y, 7 cycles
            self.seq(
                0x5b,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Lsr),
                    s2(IndirectWriter(t), Eor),
                ],
            );
        }
        // 0x5c: NOP absolute,X, 8 cycles on either part
        self.seq(
            0x5c,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddXWait),
                s1(Indirection(t)),
                s1(Wait),
                s1(Wait),
                s1(Wait),
            ],
        );
        // 0x5d: EOR absolute,X, 4* cycles
        self.seq(
            0x5d,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddX),
                s2(Indirection(t), Eor),
            ],
        );
        // 0x5e: LSR absolute,X, 7 cycles
        self.add(0x5e, s1(Immediate));
        if self.cmos {
            self.add(0x5e, s2(ImmediateWordExtension, AddX));
        } else {
            self.add(0x5e, s2(ImmediateWordExtension, AddXWait));
        }
        self.add(0x5e, s1(Indirection(t)));
        if self.cmos {
            self.add(0x5e, s1(Lsr));
        } else {
            self.add(0x5e, s2(IndirectWriter(t), Lsr));
        }
        self.add(0x5e, s1(IndirectWriter(t)));
        self.add(0x5e, s1(Decode));
        if self.cmos {
            // 0x5f: BBR5 zpage,disp, 5 cycles
            self.seq(
                0x5f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x20, 0x00)),
                ],
            );
        } else {
            // 0x5f: SRE absolute,X, 7 cycles
            self.seq(
                0x5f,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddXWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Lsr),
                    s2(IndirectWriter(t), Eor),
                ],
            );
        }
    }

    fn group_60(&mut self) {
        let t = self.tap;
        // 0x60: RTS, 6 cycles
        self.seq(
            0x60,
            &[
                s1(Wait),
                s1(Pull),
                s1(PullExtend),
                s1(Wait),
                s1(Jmp(1)),
            ],
        );
        // 0x61: ADC (zpage,X), 6 cycles
        self.add(0x61, s1(Immediate));
        self.add(0x61, s1(AddXZero));
        self.add(0x61, s1(ZPageWordIndirection(t)));
        self.add(0x61, s1(Indirection(t)));
        self.add(0x61, s1(self.adc()));
        self.add(0x61, s1(Decode));
        if self.cmos {
            self.seq(0x62, &[s1(Immediate)]);
        } else {
            self.seq(0x62, &[s1(Jam(0x62))]);
        }
        if self.cmos {
            self.nop1(0x63);
        } else {
            // 0x63: RRA (zpage,X), 8 cycles
            self.seq(
                0x63,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Ror),
                    s1(IndirectWriter(t)),
                    s1(Adc),
                ],
            );
        }
        if self.cmos {
            // 0x64: STZ zpage, 3 cycles
            self.seq(0x64, &[s2(Immediate, Zero), s1(ZPageIndirectWriter(t))]);
        } else {
            // 0x64: NOP zpage, 3 cycles
            self.seq(0x64, &[s1(Immediate), s1(ZPageIndirection(t))]);
        }
        // 0x65: ADC zpage, 3 cycles
        self.add(0x65, s1(Immediate));
        self.add(0x65, s2(ZPageIndirection(t), self.adc()));
        self.add(0x65, s1(Decode));
        // 0x66: ROR zpage, 5 cycles
        self.seq(
            0x66,
            &[
                s1(Immediate),
                s1(ZPageIndirection(t)),
                s1(Ror),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x67: RMB6 zpage, 5 cycles
            self.seq(
                0x67,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Rmb(0x40)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x67: RRA zpage, 5 cycles
            self.seq(
                0x67,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Ror),
                    s2(ZPageIndirectWriter(t), Adc),
                ],
            );
        }
        // 0x68: PLA, 4 cycles
        self.seq(0x68, &[s1(Pull), s1(Lda), s1(Wait)]);
        // 0x69: ADC #imm, 2 cycles
        self.add(0x69, s2(Immediate, self.adc()));
        self.add(0x69, s1(Decode));
        // 0x6a: ROR A, 2 cycles
        self.seq(0x6a, &[s3(Accu, Ror, Lda)]);
        if self.cmos {
            self.nop1(0x6b);
        } else {
            // 0x6b: ARR #imm, 3 cycles
            self.seq(0x6b, &[s2(Immediate, And), s3(Ror, Lda, BitWeird)]);
        }
        // 0x6c: JMP (indirect), 5 cycles. The NMOS part forgets the carry
        // into the pointer's high byte at a $xxFF boundary.
        self.add(0x6c, s1(Immediate));
        self.add(0x6c, s1(ImmediateWordExtension));
        self.add(0x6c, s1(Indirection(t)));
        if self.cmos {
            self.add(0x6c, s2(IndirectionExtendFixed(t), Jmp(0)));
        } else {
            self.add(0x6c, s2(IndirectionExtend(t), Jmp(0)));
        }
        self.add(0x6c, s1(Decode));
        // 0x6d: ADC absolute, 4 cycles
        self.add(0x6d, s1(Immediate));
        self.add(0x6d, s1(ImmediateWordExtension));
        self.add(0x6d, s2(Indirection(t), self.adc()));
        self.add(0x6d, s1(Decode));
        // 0x6e: ROR absolute, 6 cycles
        self.add(0x6e, s1(Immediate));
        self.add(0x6e, s1(ImmediateWordExtension));
        self.add(0x6e, s1(Indirection(t)));
        if self.cmos {
            self.add(0x6e, s1(Ror));
        } else {
            self.add(0x6e, s2(IndirectWriter(t), Ror));
        }
        self.add(0x6e, s1(IndirectWriter(t)));
        self.add(0x6e, s1(Decode));
        if self.cmos {
            // 0x6f: BBR6 zpage,disp, 5 cycles
            self.seq(
                0x6f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x40, 0x00)),
                ],
            );
        } else {
            // 0x6f: RRA absolute, 6 cycles
            self.seq(
                0x6f,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Ror),
                    s2(IndirectWriter(t), Adc),
                ],
            );
        }
    }

    fn group_70(&mut self) {
        let t = self.tap;
        // 0x70: BVS
        self.seq(0x70, &[s1(BranchDetect(V_MASK, V_MASK))]);
        // 0x71: ADC (zpage),Y, 5* cycles
        self.add(0x71, s1(Immediate));
        self.add(0x71, s2(ZPageWordIndirection(t), AddY));
        self.add(0x71, s1(Indirection(t)));
        self.add(0x71, s1(self.adc()));
        self.add(0x71, s1(Decode));
        if self.cmos {
            // 0x72: ADC (zpage)
            self.seq(
                0x72,
                &[
                    s1(Immediate),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s1(AdcFixed),
                ],
            );
        } else {
            self.seq(0x72, &[s1(Jam(0x72))]);
        }
        if self.cmos {
            self.nop1(0x73);
        } else {
            // 0x73: RRA (zpage),Y, 8 cycles
            self.seq(
                0x73,
                &[
                    s1(Immediate),
                    s2(ZPageWordIndirection(t), AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Ror),
                    s2(IndirectWriter(t), Adc),
                ],
            );
        }
        if self.cmos {
            // 0x74: STZ zpage,X, 4 cycles
            self.seq(
                0x74,
                &[s2(Immediate, AddXZero), s2(Zero, ZPageIndirectWriter(t))],
            );
        } else {
            // 0x74: NOP zpage,X, 4 cycles
            self.seq(0x74, &[s1(Immediate), s1(AddXZero), s1(ZPageIndirection(t))]);
        }
        // 0x75: ADC zpage,X, 4 cycles
        self.add(0x75, s1(Immediate));
        self.add(0x75, s1(AddXZero));
        self.add(0x75, s2(ZPageIndirection(t), self.adc()));
        self.add(0x75, s1(Decode));
        // 0x76: ROR zpage,X, 6 cycles
        self.seq(
            0x76,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageIndirection(t)),
                s1(Ror),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x77: RMB7 zpage, 5 cycles
            self.seq(
                0x77,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Rmb(0x80)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x77: RRA zpage,X, 6 cycles
            self.seq(
                0x77,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageIndirection(t)),
                    s1(Ror),
                    s2(ZPageIndirectWriter(t), Adc),
                ],
            );
        }
        // 0x78: SEI, 2 cycles
        self.seq(0x78, &[s1(OrToStatus(I_MASK))]);
        // 0x79: ADC absolute,Y, 4* cycles
        self.add(0x79, s1(Immediate));
        self.add(0x79, s2(ImmediateWordExtension, AddY));
        self.add(0x79, s2(Indirection(t), self.adc()));
        self.add(0x79, s1(Decode));
        if self.cmos {
            // 0x7a: PLY, 4 cycles
            self.seq(0x7a, &[s1(Pull), s1(Ldy), s1(Wait)]);
        } else {
            // 0x7a: NOP, 2 cycles
            self.seq(0x7a, &[s1(Wait)]);
        }
        if self.cmos {
            self.nop1(0x7b);
        } else {
            // 0x7b: RRA absolute,Y, 7 cycles
            self.seq(
                0x7b,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Ror),
                    s2(IndirectWriter(t), Adc),
                ],
            );
        }
        if self.cmos {
            // 0x7c: JMP (absolute,X), 6 cycles
            self.seq(
                0x7c,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                    s3(IndirectionExtendFixed(t), AddXWait, Jmp(0)),
                ],
            );
        } else {
            // 0x7c: NOP absolute,X, 4* cycles
            self.seq(
                0x7c,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddX),
                    s1(Indirection(t)),
                ],
            );
        }
        // 0x7d: ADC absolute,X, 4* cycles
        self.add(0x7d, s1(Immediate));
        self.add(0x7d, s2(ImmediateWordExtension, AddX));
        self.add(0x7d, s2(Indirection(t), self.adc()));
        self.add(0x7d, s1(Decode));
        // 0x7e: ROR absolute,X, 7 cycles
        self.add(0x7e, s1(Immediate));
        if self.cmos {
            self.add(0x7e, s2(ImmediateWordExtension, AddX));
        } else {
            self.add(0x7e, s2(ImmediateWordExtension, AddXWait));
        }
        self.add(0x7e, s1(Indirection(t)));
        if self.cmos {
            self.add(0x7e, s1(Ror));
        } else {
            self.add(0x7e, s2(IndirectWriter(t), Ror));
        }
        self.add(0x7e, s1(IndirectWriter(t)));
        self.add(0x7e, s1(Decode));
        if self.cmos {
            // 0x7f: BBR7 zpage,disp, 5 cycles
            self.seq(
                0x7f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x80, 0x00)),
                ],
            );
        } else {
            // 0x7f: RRA absolute,X, 7 cycles
            self.seq(
                0x7f,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddXWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Ror),
                    s2(IndirectWriter(t), Adc),
                ],
            );
        }
    }

    fn group_80(&mut self) {
        let t = self.tap;
        if self.cmos {
            // 0x80: BRA, branch always
            self.seq(0x80, &[s1(BranchDetect(0, 0))]);
        } else {
            // 0x80: NOP #imm, 2 cycles
            self.seq(0x80, &[s1(Immediate)]);
        }
        // 0x81: STA (zpage,X), 6 cycles
        self.seq(
            0x81,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageWordIndirection(t)),
                s1(Accu),
                s1(IndirectWriter(t)),
            ],
        );
        // 0x82: NOP #imm, 2 cycles
        self.seq(0x82, &[s1(Immediate)]);
        if self.cmos {
            self.nop1(0x83);
        } else {
            // 0x83: SAX (zpage,X), 6 cycles
            self.seq(
                0x83,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageWordIndirection(t)),
                    s1(Anx),
                    s1(IndirectWriter(t)),
                ],
            );
        }
        // 0x84: STY zpage, 3 cycles
        self.seq(0x84, &[s2(Immediate, YReg), s1(ZPageIndirectWriter(t))]);
        // 0x85: STA zpage, 3 cycles
        self.seq(0x85, &[s2(Immediate, Accu), s1(ZPageIndirectWriter(t))]);
        // 0x86: STX zpage, 3 cycles
        self.seq(0x86, &[s2(Immediate, XReg), s1(ZPageIndirectWriter(t))]);
        if self.cmos {
            // 0x87: SMB0 zpage, 5 cycles
            self.seq(
                0x87,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Smb(0x01)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x87: SAX zpage, 3 cycles
            self.seq(0x87, &[s2(Immediate, Anx), s1(ZPageIndirectWriter(t))]);
        }
        // 0x88: DEY, 2 cycles
        self.seq(0x88, &[s3(YReg, Dec, Ldy)]);
        // 0x89: NOP #imm, 2 cycles
        self.seq(0x89, &[s1(Immediate)]);
        // 0x8a: TXA, 2 cycles
        self.seq(0x8a, &[s2(XReg, Lda)]);
        if self.cmos {
            self.nop1(0x8b);
        } else {
            // 0x8b: XAA, not reproducible on real silicon
            self.seq(0x8b, &[s1(Unstable(0x8b))]);
        }
        // 0x8c: STY absolute, 4 cycles
        self.seq(
            0x8c,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, YReg),
                s1(IndirectWriter(t)),
            ],
        );
        // 0x8d: STA absolute, 4 cycles
        self.seq(
            0x8d,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, Accu),
                s1(IndirectWriter(t)),
            ],
        );
        // 0x8e: STX absolute, 4 cycles
        self.seq(
            0x8e,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, XReg),
                s1(IndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x8f: BBS0 zpage,disp, 5 cycles
            self.seq(
                0x8f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x01, 0x01)),
                ],
            );
        } else {
            // 0x8f: SAX absolute, 4 cycles
            self.seq(
                0x8f,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, Anx),
                    s1(IndirectWriter(t)),
                ],
            );
        }
    }

    fn group_90(&mut self) {
        let t = self.tap;
        // 0x90: BCC
        self.seq(0x90, &[s1(BranchDetect(C_MASK, 0))]);
        // 0x91: STA (zpage),Y, 6 cycles
        self.seq(
            0x91,
            &[
                s1(Immediate),
                s2(ZPageWordIndirection(t), AddYWait),
                s1(Accu),
                s1(IndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x92: STA (zpage), 5 cycles
            self.seq(
                0x92,
                &[
                    s1(Immediate),
                    s1(ZPageWordIndirection(t)),
                    s1(Accu),
                    s1(IndirectWriter(t)),
                ],
            );
        } else {
            self.seq(0x92, &[s1(Jam(0x92))]);
        }
        if self.cmos {
            self.nop1(0x93);
        } else {
            // 0x93: AHX (zpage),Y, does not work reliably
            self.seq(0x93, &[s1(Unstable(0x93))]);
        }
        // 0x94: STY zpage,X, 4 cycles
        self.seq(
            0x94,
            &[
                s1(Immediate),
                s1(AddXZero),
                s2(YReg, ZPageIndirectWriter(t)),
            ],
        );
        // 0x95: STA zpage,X, 4 cycles
        self.seq(
            0x95,
            &[
                s1(Immediate),
                s1(AddXZero),
                s2(Accu, ZPageIndirectWriter(t)),
            ],
        );
        // 0x96: STX zpage,Y, 4 cycles
        self.seq(
            0x96,
            &[
                s1(Immediate),
                s1(AddYZero),
                s2(XReg, ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0x97: SMB1 zpage, 5 cycles
            self.seq(
                0x97,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Smb(0x02)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0x97: SAX zpage,Y, 4 cycles
            self.seq(
                0x97,
                &[
                    s1(Immediate),
                    s1(AddYZero),
                    s2(Anx, ZPageIndirectWriter(t)),
                ],
            );
        }
        // 0x98: TYA, 2 cycles
        self.seq(0x98, &[s2(YReg, Lda)]);
        // 0x99: STA absolute,Y, 5 cycles
        self.seq(
            0x99,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddYWait),
                s2(Accu, IndirectWriter(t)),
            ],
        );
        // 0x9a: TXS, 2 cycles
        self.seq(0x9a, &[s2(XReg, SetStack)]);
        if self.cmos {
            self.nop1(0x9b);
        } else {
            // 0x9b: TAS, unreliable
            self.seq(0x9b, &[s1(Unstable(0x9b))]);
        }
        if self.cmos {
            // 0x9c: STZ absolute, 4 cycles
            self.seq(
                0x9c,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, Zero),
                    s1(IndirectWriter(t)),
                ],
            );
        } else {
            // 0x9c: SHY absolute,X, 5 cycles
            self.seq(
                0x9c,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(AndHiPlusOneYAddX),
                    s1(IndirectWriter(t)),
                ],
            );
        }
        // 0x9d: STA absolute,X, 5 cycles
        self.add(0x9d, s1(Immediate));
        if self.cmos {
            self.add(0x9d, s2(ImmediateWordExtension, AddX));
        } else {
            self.add(0x9d, s2(ImmediateWordExtension, AddXWait));
        }
        self.add(0x9d, s2(Accu, IndirectWriter(t)));
        self.add(0x9d, s1(Decode));
        if self.cmos {
            // 0x9e: STZ absolute,X, 5 cycles
            self.seq(
                0x9e,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddX),
                    s2(Zero, IndirectWriter(t)),
                ],
            );
        } else {
            // 0x9e: SHX absolute,Y, 5 cycles
            self.seq(
                0x9e,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(AndHiPlusOneXAddY),
                    s1(IndirectWriter(t)),
                ],
            );
        }
        if self.cmos {
            // 0x9f: BBS1 zpage,disp, 5 cycles
            self.seq(
                0x9f,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x02, 0x02)),
                ],
            );
        } else {
            // 0x9f: AHX absolute,Y, unreliable
            self.seq(0x9f, &[s1(Unstable(0x9f))]);
        }
    }

    fn group_a0(&mut self) {
        let t = self.tap;
        // 0xa0: LDY #imm, 2 cycles
        self.seq(0xa0, &[s2(Immediate, Ldy)]);
        // 0xa1: LDA (zpage,X), 6 cycles
        self.seq(
            0xa1,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageWordIndirection(t)),
                s1(Indirection(t)),
                s1(Lda),
            ],
        );
        // 0xa2: LDX #imm, 2 cycles
        self.seq(0xa2, &[s2(Immediate, Ldx)]);
        if self.cmos {
            self.nop1(0xa3);
        } else {
            // 0xa3: LAX (zpage,X), 6 cycles
            self.seq(
                0xa3,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s2(Lda, Ldx),
                ],
            );
        }
        // 0xa4: LDY zpage, 3 cycles
        self.seq(0xa4, &[s1(Immediate), s2(ZPageIndirection(t), Ldy)]);
        // 0xa5: LDA zpage, 3 cycles
        self.seq(0xa5, &[s1(Immediate), s2(ZPageIndirection(t), Lda)]);
        // 0xa6: LDX zpage, 3 cycles
        self.seq(0xa6, &[s1(Immediate), s2(ZPageIndirection(t), Ldx)]);
        if self.cmos {
            // 0xa7: SMB2 zpage, 5 cycles
            self.seq(
                0xa7,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Smb(0x04)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0xa7: LAX zpage, 3 cycles
            self.seq(0xa7, &[s1(Immediate), s3(ZPageIndirection(t), Lda, Ldx)]);
        }
        // 0xa8: TAY, 2 cycles
        self.seq(0xa8, &[s2(Accu, Ldy)]);
        // 0xa9: LDA #imm, 2 cycles
        self.seq(0xa9, &[s2(Immediate, Lda)]);
        // 0xaa: TAX, 2 cycles
        self.seq(0xaa, &[s2(Accu, Ldx)]);
        if self.cmos {
            self.nop1(0xab);
        } else {
            // 0xab: LAX #imm, 2 cycles
            self.seq(0xab, &[s3(Immediate, Lda, Ldx)]);
        }
        // 0xac: LDY absolute, 4 cycles
        self.seq(
            0xac,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), Ldy),
            ],
        );
        // 0xad: LDA absolute, 4 cycles
        self.seq(
            0xad,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), Lda),
            ],
        );
        // 0xae: LDX absolute, 4 cycles
        self.seq(
            0xae,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), Ldx),
            ],
        );
        if self.cmos {
            // 0xaf: BBS2 zpage,disp, 5 cycles
            self.seq(
                0xaf,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x04, 0x04)),
                ],
            );
        } else {
            // 0xaf: LAX absolute, 4 cycles
            self.seq(
                0xaf,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s3(Indirection(t), Lda, Ldx),
                ],
            );
        }
    }

    fn group_b0(&mut self) {
        let t = self.tap;
        // 0xb0: BCS
        self.seq(0xb0, &[s1(BranchDetect(C_MASK, C_MASK))]);
        // 0xb1: LDA (zpage),Y, 5* cycles
        self.seq(
            0xb1,
            &[
                s1(Immediate),
                s1(ZPageWordIndirection(t)),
                s2(AddY, Indirection(t)),
                s1(Lda),
            ],
        );
        if self.cmos {
            // 0xb2: LDA (zpage), 5 cycles
            self.seq(
                0xb2,
                &[
                    s1(Immediate),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s1(Lda),
                ],
            );
        } else {
            self.seq(0xb2, &[s1(Jam(0xb2))]);
        }
        if self.cmos {
            self.nop1(0xb3);
        } else {
            // 0xb3: LAX (zpage),Y, 5* cycles
            self.seq(
                0xb3,
                &[
                    s1(Immediate),
                    s1(ZPageWordIndirection(t)),
                    s2(AddY, Indirection(t)),
                    s2(Lda, Ldx),
                ],
            );
        }
        // 0xb4: LDY zpage,X, 4 cycles
        self.seq(
            0xb4,
            &[s1(Immediate), s1(AddXZero), s2(ZPageIndirection(t), Ldy)],
        );
        // 0xb5: LDA zpage,X, 4 cycles
        self.seq(
            0xb5,
            &[s1(Immediate), s1(AddXZero), s2(ZPageIndirection(t), Lda)],
        );
        // 0xb6: LDX zpage,Y, 4 cycles
        self.seq(
            0xb6,
            &[s1(Immediate), s1(AddYZero), s2(ZPageIndirection(t), Ldx)],
        );
        if self.cmos {
            // 0xb7: SMB3 zpage, 5 cycles
            self.seq(
                0xb7,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Smb(0x08)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0xb7: LAX zpage,Y, 4 cycles
            self.seq(
                0xb7,
                &[
                    s1(Immediate),
                    s1(AddYZero),
                    s3(ZPageIndirection(t), Lda, Ldx),
                ],
            );
        }
        // 0xb8: CLV, 2 cycles
        self.seq(0xb8, &[s1(AndToStatus(!V_MASK))]);
        // 0xb9: LDA absolute,Y, 4* cycles
        self.seq(
            0xb9,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddY),
                s2(Indirection(t), Lda),
            ],
        );
        // 0xba: TSX, 2 cycles
        self.seq(0xba, &[s2(GetStack, Ldx)]);
        if self.cmos {
            self.nop1(0xbb);
        } else {
            // 0xbb: LAS absolute,Y, unreliable
            self.seq(0xbb, &[s1(Unstable(0xbb))]);
        }
        // 0xbc: LDY absolute,X, 4* cycles
        self.seq(
            0xbc,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddX),
                s2(Indirection(t), Ldy),
            ],
        );
        // 0xbd: LDA absolute,X, 4* cycles
        self.seq(
            0xbd,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddX),
                s2(Indirection(t), Lda),
            ],
        );
        // 0xbe: LDX absolute,Y, 4* cycles
        self.seq(
            0xbe,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddY),
                s2(Indirection(t), Ldx),
            ],
        );
        if self.cmos {
            // 0xbf: BBS3 zpage,disp, 5 cycles
            self.seq(
                0xbf,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x08, 0x08)),
                ],
            );
        } else {
            // 0xbf: LAX absolute,Y, 4* cycles
            self.seq(
                0xbf,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddY),
                    s3(Indirection(t), Lda, Ldx),
                ],
            );
        }
    }

    fn group_c0(&mut self) {
        let t = self.tap;
        // 0xc0: CPY #imm, 2 cycles
        self.seq(0xc0, &[s2(Immediate, Cpy)]);
        // 0xc1: CMP (zpage,X), 6 cycles
        self.seq(
            0xc1,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageWordIndirection(t)),
                s1(Indirection(t)),
                s1(Cmp),
            ],
        );
        // 0xc2: NOP #imm, 2 cycles
        self.seq(0xc2, &[s1(Immediate)]);
        if self.cmos {
            self.nop1(0xc3);
        } else {
            // 0xc3: DCP (zpage,X), 8 cycles
            self.seq(
                0xc3,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Dec),
                    s1(IndirectWriter(t)),
                    s1(Cmp),
                ],
            );
        }
        // 0xc4: CPY zpage, 3 cycles
        self.seq(0xc4, &[s1(Immediate), s2(ZPageIndirection(t), Cpy)]);
        // 0xc5: CMP zpage, 3 cycles
        self.seq(0xc5, &[s1(Immediate), s2(ZPageIndirection(t), Cmp)]);
        // 0xc6: DEC zpage, 5 cycles
        self.seq(
            0xc6,
            &[
                s1(Immediate),
                s1(ZPageIndirection(t)),
                s1(Dec),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0xc7: SMB4 zpage, 5 cycles
            self.seq(
                0xc7,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Smb(0x10)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0xc7: DCP zpage, 5 cycles
            self.seq(
                0xc7,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Dec),
                    s2(ZPageIndirectWriter(t), Cmp),
                ],
            );
        }
        // 0xc8: INY, 2 cycles
        self.seq(0xc8, &[s3(YReg, Inc, Ldy)]);
        // 0xc9: CMP #imm, 2 cycles
        self.seq(0xc9, &[s2(Immediate, Cmp)]);
        // 0xca: DEX, 2 cycles
        self.seq(0xca, &[s3(XReg, Dec, Ldx)]);
        if self.cmos {
            // 0xcb: WAI, parks the CPU until an interrupt
            self.seq(0xcb, &[s1(Halt)]);
        } else {
            // 0xcb: SBX #imm: X = (A & X) - imm with compare flags
            self.add(0xcb, s3(Anx, Ldx, Immediate));
            self.add(0xcb, s3(Cpx, Ldx, Decode));
        }
        // 0xcc: CPY absolute, 4 cycles
        self.seq(
            0xcc,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), Cpy),
            ],
        );
        // 0xcd: CMP absolute, 4 cycles
        self.seq(
            0xcd,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), Cmp),
            ],
        );
        // 0xce: DEC absolute, 6 cycles
        self.add(0xce, s1(Immediate));
        self.add(0xce, s1(ImmediateWordExtension));
        self.add(0xce, s1(Indirection(t)));
        if self.cmos {
            self.add(0xce, s1(Dec));
        } else {
            self.add(0xce, s2(IndirectWriter(t), Dec));
        }
        self.add(0xce, s1(IndirectWriter(t)));
        self.add(0xce, s1(Decode));
        if self.cmos {
            // 0xcf: BBS4 zpage,disp, 5 cycles
            self.seq(
                0xcf,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x10, 0x10)),
                ],
            );
        } else {
            // 0xcf: DCP absolute, 6 cycles
            self.seq(
                0xcf,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Dec),
                    s2(IndirectWriter(t), Cmp),
                ],
            );
        }
    }

    fn group_d0(&mut self) {
        let t = self.tap;
        // 0xd0: BNE
        self.seq(0xd0, &[s1(BranchDetect(Z_MASK, 0))]);
        // 0xd1: CMP (zpage),Y, 5* cycles
        self.seq(
            0xd1,
            &[
                s1(Immediate),
                s2(ZPageWordIndirection(t), AddY),
                s1(Indirection(t)),
                s1(Cmp),
            ],
        );
        if self.cmos {
            // 0xd2: CMP (zpage)
            self.seq(
                0xd2,
                &[
                    s1(Immediate),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s1(Cmp),
                ],
            );
        } else {
            self.seq(0xd2, &[s1(Jam(0xd2))]);
        }
        if self.cmos {
            self.nop1(0xd3);
        } else {
            // 0xd3: DCP (zpage),Y, 8 cycles
            self.seq(
                0xd3,
                &[
                    s1(Immediate),
                    s2(ZPageWordIndirection(t), AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Dec),
                    s2(IndirectWriter(t), Cmp),
                ],
            );
        }
        // 0xd4: NOP zpage,X, 4 cycles
        self.seq(0xd4, &[s1(Immediate), s1(AddXZero), s1(ZPageIndirection(t))]);
        // 0xd5: CMP zpage,X, 4 cycles
        self.seq(
            0xd5,
            &[s1(Immediate), s1(AddXZero), s2(ZPageIndirection(t), Cmp)],
        );
        // 0xd6: DEC zpage,X, 6 cycles
        self.seq(
            0xd6,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageIndirection(t)),
                s1(Dec),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0xd7: SMB5 zpage, 5 cycles
            self.seq(
                0xd7,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Smb(0x20)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0xd7: DCP zpage,X, 6 cycles
            self.seq(
                0xd7,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageIndirection(t)),
                    s1(Dec),
                    s2(ZPageIndirectWriter(t), Cmp),
                ],
            );
        }
        // 0xd8: CLD, 2 cycles
        self.seq(0xd8, &[s1(AndToStatus(!D_MASK))]);
        // 0xd9: CMP absolute,Y, 4* cycles
        self.seq(
            0xd9,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddY),
                s2(Indirection(t), Cmp),
            ],
        );
        if self.cmos {
            // 0xda: PHX, 3 cycles
            self.seq(0xda, &[s1(XReg), s1(Push)]);
        } else {
            // 0xda: NOP, 2 cycles
            self.seq(0xda, &[s1(Wait)]);
        }
        if self.cmos {
            // 0xdb: STP; jamming does pretty much the same
            self.seq(0xdb, &[s1(Jam(0xdb))]);
        } else {
            // 0xdb: DCP absolute,Y, 7 cycles
            self.seq(
                0xdb,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Dec),
                    s2(IndirectWriter(t), Cmp),
                ],
            );
        }
        // 0xdc: NOP absolute,X, 4* cycles
        self.seq(
            0xdc,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddX),
                s1(Indirection(t)),
            ],
        );
        // 0xdd: CMP absolute,X, 4* cycles
        self.seq(
            0xdd,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddX),
                s2(Indirection(t), Cmp),
            ],
        );
        // 0xde: DEC absolute,X, 7 cycles (even on the 65C02)
        self.add(0xde, s1(Immediate));
        self.add(0xde, s2(ImmediateWordExtension, AddXWait));
        self.add(0xde, s1(Indirection(t)));
        if self.cmos {
            self.add(0xde, s1(Dec));
        } else {
            self.add(0xde, s2(IndirectWriter(t), Dec));
        }
        self.add(0xde, s1(IndirectWriter(t)));
        self.add(0xde, s1(Decode));
        if self.cmos {
            // 0xdf: BBS5 zpage,disp, 5 cycles
            self.seq(
                0xdf,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x20, 0x20)),
                ],
            );
        } else {
            // 0xdf: DCP absolute,X, 7 cycles
            self.seq(
                0xdf,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddXWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Dec),
                    s2(IndirectWriter(t), Cmp),
                ],
            );
        }
    }

    fn group_e0(&mut self) {
        let t = self.tap;
        // 0xe0: CPX #imm, 2 cycles
        self.seq(0xe0, &[s2(Immediate, Cpx)]);
        // 0xe1: SBC (zpage,X), 6 cycles
        self.add(0xe1, s1(Immediate));
        self.add(0xe1, s1(AddXZero));
        self.add(0xe1, s1(ZPageWordIndirection(t)));
        self.add(0xe1, s1(Indirection(t)));
        self.add(0xe1, s1(self.sbc()));
        self.add(0xe1, s1(Decode));
        // 0xe2: NOP #imm, 2 cycles
        self.seq(0xe2, &[s1(Immediate)]);
        if self.cmos {
            self.nop1(0xe3);
        } else {
            // 0xe3: ISC (zpage,X), 8 cycles
            self.seq(
                0xe3,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Inc),
                    s1(IndirectWriter(t)),
                    s1(Sbc),
                ],
            );
        }
        // 0xe4: CPX zpage, 3 cycles
        self.seq(0xe4, &[s1(Immediate), s2(ZPageIndirection(t), Cpx)]);
        // 0xe5: SBC zpage, 3 cycles
        self.add(0xe5, s1(Immediate));
        self.add(0xe5, s2(ZPageIndirection(t), self.sbc()));
        self.add(0xe5, s1(Decode));
        // 0xe6: INC zpage, 5 cycles
        self.seq(
            0xe6,
            &[
                s1(Immediate),
                s1(ZPageIndirection(t)),
                s1(Inc),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0xe7: SMB6 zpage, 5 cycles
            self.seq(
                0xe7,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Smb(0x40)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0xe7: ISC zpage, 5 cycles
            self.seq(
                0xe7,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Inc),
                    s2(ZPageIndirectWriter(t), Sbc),
                ],
            );
        }
        // 0xe8: INX, 2 cycles
        self.seq(0xe8, &[s3(XReg, Inc, Ldx)]);
        // 0xe9: SBC #imm, 2 cycles
        self.add(0xe9, s2(Immediate, self.sbc()));
        self.add(0xe9, s1(Decode));
        // 0xea: NOP, the one and only real one, 2 cycles
        self.seq(0xea, &[s1(Wait)]);
        if self.cmos {
            self.nop1(0xeb);
        } else {
            // 0xeb: a workalike of SBC #imm
            self.seq(0xeb, &[s2(Immediate, Sbc)]);
        }
        // 0xec: CPX absolute, 4 cycles
        self.seq(
            0xec,
            &[
                s1(Immediate),
                s1(ImmediateWordExtension),
                s2(Indirection(t), Cpx),
            ],
        );
        // 0xed: SBC absolute, 4 cycles
        self.add(0xed, s1(Immediate));
        self.add(0xed, s1(ImmediateWordExtension));
        self.add(0xed, s2(Indirection(t), self.sbc()));
        self.add(0xed, s1(Decode));
        // 0xee: INC absolute, 6 cycles
        self.add(0xee, s1(Immediate));
        self.add(0xee, s1(ImmediateWordExtension));
        self.add(0xee, s1(Indirection(t)));
        if self.cmos {
            self.add(0xee, s1(Inc));
        } else {
            self.add(0xee, s2(IndirectWriter(t), Inc));
        }
        self.add(0xee, s1(IndirectWriter(t)));
        self.add(0xee, s1(Decode));
        if self.cmos {
            // 0xef: BBS6 zpage,disp, 5 cycles
            self.seq(
                0xef,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x40, 0x40)),
                ],
            );
        } else {
            // 0xef: ISC absolute, 6 cycles
            self.seq(
                0xef,
                &[
                    s1(Immediate),
                    s1(ImmediateWordExtension),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Inc),
                    s2(IndirectWriter(t), Sbc),
                ],
            );
        }
    }

    fn group_f0(&mut self) {
        let t = self.tap;
        // 0xf0: BEQ
        self.seq(0xf0, &[s1(BranchDetect(Z_MASK, Z_MASK))]);
        // 0xf1: SBC (zpage),Y, 5* cycles
        self.add(0xf1, s1(Immediate));
        self.add(0xf1, s2(ZPageWordIndirection(t), AddY));
        self.add(0xf1, s1(Indirection(t)));
        self.add(0xf1, s1(self.sbc()));
        self.add(0xf1, s1(Decode));
        if self.cmos {
            // 0xf2: SBC (zpage)
            self.seq(
                0xf2,
                &[
                    s1(Immediate),
                    s1(ZPageWordIndirection(t)),
                    s1(Indirection(t)),
                    s1(SbcFixed),
                ],
            );
        } else {
            self.seq(0xf2, &[s1(Jam(0xf2))]);
        }
        if self.cmos {
            self.nop1(0xf3);
        } else {
            // 0xf3: ISC (zpage),Y, 8 cycles
            self.seq(
                0xf3,
                &[
                    s1(Immediate),
                    s2(ZPageWordIndirection(t), AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Inc),
                    s2(IndirectWriter(t), Sbc),
                ],
            );
        }
        // 0xf4: NOP zpage,X, 4 cycles
        self.seq(0xf4, &[s1(Immediate), s1(AddXZero), s1(ZPageIndirection(t))]);
        // 0xf5: SBC zpage,X, 4 cycles
        self.add(0xf5, s1(Immediate));
        self.add(0xf5, s1(AddXZero));
        self.add(0xf5, s2(ZPageIndirection(t), self.sbc()));
        self.add(0xf5, s1(Decode));
        // 0xf6: INC zpage,X, 6 cycles
        self.seq(
            0xf6,
            &[
                s1(Immediate),
                s1(AddXZero),
                s1(ZPageIndirection(t)),
                s1(Inc),
                s1(ZPageIndirectWriter(t)),
            ],
        );
        if self.cmos {
            // 0xf7: SMB7 zpage, 5 cycles
            self.seq(
                0xf7,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(Smb(0x80)),
                    s1(ZPageIndirectWriter(t)),
                ],
            );
        } else {
            // 0xf7: ISC zpage,X, 6 cycles
            self.seq(
                0xf7,
                &[
                    s1(Immediate),
                    s1(AddXZero),
                    s1(ZPageIndirection(t)),
                    s1(Inc),
                    s2(ZPageIndirectWriter(t), Sbc),
                ],
            );
        }
        // 0xf8: SED, 2 cycles
        self.seq(0xf8, &[s1(OrToStatus(D_MASK))]);
        // 0xf9: SBC absolute,Y, 4* cycles
        self.add(0xf9, s1(Immediate));
        self.add(0xf9, s2(ImmediateWordExtension, AddY));
        self.add(0xf9, s2(Indirection(t), self.sbc()));
        self.add(0xf9, s1(Decode));
        if self.cmos {
            // 0xfa: PLX, 4 cycles
            self.seq(0xfa, &[s1(Pull), s1(Ldx), s1(Wait)]);
        } else {
            // 0xfa: NOP, 2 cycles
            self.seq(0xfa, &[s1(Wait)]);
        }
        if self.cmos {
            self.nop1(0xfb);
        } else {
            // 0xfb: ISC absolute,Y, 7 cycles
            self.seq(
                0xfb,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddYWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Inc),
                    s2(IndirectWriter(t), Sbc),
                ],
            );
        }
        // 0xfc: NOP absolute,X, 4* cycles
        self.seq(
            0xfc,
            &[
                s1(Immediate),
                s2(ImmediateWordExtension, AddX),
                s1(Indirection(t)),
            ],
        );
        // 0xfd: SBC absolute,X, 4* cycles
        self.add(0xfd, s1(Immediate));
        self.add(0xfd, s2(ImmediateWordExtension, AddX));
        self.add(0xfd, s2(Indirection(t), self.sbc()));
        self.add(0xfd, s1(Decode));
        // 0xfe: INC absolute,X, 7 cycles
        self.add(0xfe, s1(Immediate));
        self.add(0xfe, s2(ImmediateWordExtension, AddXWait));
        self.add(0xfe, s1(Indirection(t)));
        if self.cmos {
            self.add(0xfe, s1(Inc));
        } else {
            self.add(0xfe, s2(IndirectWriter(t), Inc));
        }
        self.add(0xfe, s1(IndirectWriter(t)));
        self.add(0xfe, s1(Decode));
        if self.cmos {
            // 0xff: BBS7 zpage,disp, 5 cycles
            self.seq(
                0xff,
                &[
                    s1(Immediate),
                    s1(ZPageIndirection(t)),
                    s1(BranchBitTest(0x80, 0x80)),
                ],
            );
        } else {
            // 0xff: ISC absolute,X, 7 cycles
            self.seq(
                0xff,
                &[
                    s1(Immediate),
                    s2(ImmediateWordExtension, AddXWait),
                    s1(Indirection(t)),
                    s2(IndirectWriter(t), Inc),
                    s2(IndirectWriter(t), Sbc),
                ],
            );
        }
    }

    /// RESET, NMI and IRQ micro-programs, assembled from the same steps as
    /// BRK.
    fn group_extra(&mut self) {
        use super::structs::{OP_IRQ, OP_NMI, OP_RESET};
        // RESET: load the reset vector and go
        self.seq(
            OP_RESET,
            &[
                s1(LoadVector(0xfffc, I_MASK)),
                s1(LoadVectorExtend(0xfffc)),
                s1(Jmp(0)),
            ],
        );
        // NMI: push PC and P (B cleared), vector through 0xfffa, 7 cycles
        self.add(OP_NMI, s2(LoadPc(0), PushExtend));
        self.add(OP_NMI, s1(Push));
        self.add(OP_NMI, s2(AndToStatus(!B_MASK), Push));
        if self.cmos {
            self.add(OP_NMI, s2(AndToStatus(!D_MASK), LoadVectorExtend(0xfffa)));
            self.add(OP_NMI, s1(LoadVector(0xfffa, I_MASK)));
        } else {
            self.add(OP_NMI, s1(LoadVectorExtend(0xfffa)));
            self.add(OP_NMI, s1(LoadVector(0xfffa, I_MASK)));
        }
        self.add(OP_NMI, s2(NmiReset, Jmp(0)));
        self.add(OP_NMI, s1(Decode));
        // IRQ: the same dance through 0xfffe, with the NMOS hijack quirk
        self.add(OP_IRQ, s2(LoadPc(0), PushExtend));
        self.add(OP_IRQ, s1(Push));
        self.add(OP_IRQ, s2(AndToStatus(!B_MASK), Push));
        if self.cmos {
            self.add(OP_IRQ, s2(AndToStatus(!D_MASK), LoadVectorExtend(0xfffe)));
            self.add(OP_IRQ, s1(LoadVector(0xfffe, I_MASK)));
            self.add(OP_IRQ, s1(Jmp(0)));
        } else {
            self.add(OP_IRQ, s1(LoadVectorExtend(0xfffe)));
            self.add(OP_IRQ, s1(LoadVectorQuirk(0xfffe, 0xfffa, I_MASK)));
            self.add(OP_IRQ, s2(NmiReset, Jmp(0)));
        }
        self.add(OP_IRQ, s1(Decode));
    }

    fn adc(&self) -> MicroOp {
        if self.cmos {
            AdcFixed
        } else {
            Adc
        }
    }

    fn sbc(&self) -> MicroOp {
        if self.cmos {
            SbcFixed
        } else {
            Sbc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The data-sheet cycle count of an opcode: its table steps plus the
    /// waits some micro-ops insert unconditionally. Conditional penalties
    /// (page crossing, taken branches, decimal fix-up) are on top of this.
    fn cycles(table: &[ExecutionSequence], op: usize) -> usize {
        let seq = &table[op];
        let inserted = seq.steps[..seq.cycles()]
            .iter()
            .flat_map(|step| step.ops.iter())
            .filter(|op| matches!(op, AddXWait | AddYWait | BranchBitTest(_, _)))
            .count();
        seq.cycles() + inserted
    }

    #[test]
    fn published_cycle_counts_nmos() {
        let t = build_instructions(CpuFlavor::Nmos6502, BusTap::Plain);
        // a representative spread over the addressing modes
        assert_eq!(cycles(&t, 0xa9), 2); // LDA #
        assert_eq!(cycles(&t, 0xa5), 3); // LDA zp
        assert_eq!(cycles(&t, 0xb5), 4); // LDA zp,X
        assert_eq!(cycles(&t, 0xad), 4); // LDA abs
        assert_eq!(cycles(&t, 0xa1), 6); // LDA (zp,X)
        assert_eq!(cycles(&t, 0xb1), 5); // LDA (zp),Y
        assert_eq!(cycles(&t, 0x00), 7); // BRK
        assert_eq!(cycles(&t, 0x20), 6); // JSR
        assert_eq!(cycles(&t, 0x60), 6); // RTS
        assert_eq!(cycles(&t, 0x40), 6); // RTI
        assert_eq!(cycles(&t, 0x4c), 3); // JMP abs
        assert_eq!(cycles(&t, 0x6c), 5); // JMP (ind)
        assert_eq!(cycles(&t, 0x48), 3); // PHA
        assert_eq!(cycles(&t, 0x68), 4); // PLA
        assert_eq!(cycles(&t, 0x06), 5); // ASL zp
        assert_eq!(cycles(&t, 0x1e), 7); // ASL abs,X
        assert_eq!(cycles(&t, 0x91), 6); // STA (zp),Y
        assert_eq!(cycles(&t, 0x99), 5); // STA abs,Y
        assert_eq!(cycles(&t, 0x9d), 5); // STA abs,X
        assert_eq!(cycles(&t, 0xd0), 2); // BNE
        assert_eq!(cycles(&t, 0xea), 2); // NOP
        assert_eq!(cycles(&t, 0x5c), 8); // the big NOP abs,X
        assert_eq!(cycles(&t, 0x03), 8); // SLO (zp,X)
        assert_eq!(cycles(&t, 0xcf), 6); // DCP abs
    }

    #[test]
    fn published_cycle_counts_cmos() {
        let t = build_instructions(CpuFlavor::Wdc65C02, BusTap::Plain);
        assert_eq!(cycles(&t, 0xa9), 2); // LDA #
        assert_eq!(cycles(&t, 0x64), 3); // STZ zp
        assert_eq!(cycles(&t, 0x9c), 4); // STZ abs
        assert_eq!(cycles(&t, 0x7c), 6); // JMP (abs,X)
        assert_eq!(cycles(&t, 0x12), 5); // ORA (zp)
        assert_eq!(cycles(&t, 0x04), 5); // TSB zp
        assert_eq!(cycles(&t, 0x0f), 5); // BBR0 zp,disp
        assert_eq!(cycles(&t, 0xda), 3); // PHX
        assert_eq!(cycles(&t, 0xfa), 4); // PLX
        assert_eq!(cycles(&t, 0x1e), 6); // ASL abs,X lost a cycle
        assert_eq!(cycles(&t, 0xde), 7); // DEC abs,X kept the NMOS count
    }

    #[test]
    fn every_sequence_terminates_in_decode() {
        for flavor in [CpuFlavor::Nmos6502, CpuFlavor::Wdc65C02] {
            let t = build_instructions(flavor, BusTap::Plain);
            for (i, seq) in t.iter().enumerate() {
                let last = seq.steps[seq.cycles() - 1];
                assert!(
                    last.ops.contains(&MicroOp::Decode),
                    "sequence {:03x} does not decode",
                    i
                );
            }
        }
    }
}
